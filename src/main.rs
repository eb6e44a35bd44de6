use anyhow::Context;
use library_catalog::config::Config;
use library_catalog::database::{
    DefaultAuthorRepository, DefaultBookRepository, DefaultGenreRepository, establish_pool,
};
use library_catalog::models::{Author, Book, BookFilter, Genre};
use library_catalog::repositories::{AuthorRepository, BookRepository, GenreRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level())
        .init();

    let pool = establish_pool(config.database_url()).await?;
    let authors = DefaultAuthorRepository::new(pool.clone());
    let genres = DefaultGenreRepository::new(pool.clone());
    let books = DefaultBookRepository::new(pool);

    // A rerun against the same database skips the inserts and leaves ids unset.
    let mut author = authors.save_author(Author::new("Ursula K. Le Guin")).await?;
    if author.id().is_none() {
        author = authors
            .find_all_authors()
            .await?
            .into_iter()
            .find(|stored| stored.name() == author.name())
            .context("Author vanished after duplicate check")?;
    }
    let mut genre = genres.save_genre(Genre::new("Science Fiction")).await?;
    if genre.id().is_none() {
        genre = genres
            .find_all_genres()
            .await?
            .into_iter()
            .find(|stored| stored.name() == genre.name())
            .context("Genre vanished after duplicate check")?;
    }
    let saved = books
        .save_book(Book::new("The Dispossessed", author, genre, "9780061054884"))
        .await?;
    tracing::info!(?saved, "saved book");

    if let Some(id) = saved.id() {
        let found = books.find_book(id).await?;
        tracing::info!(?found, "found book by id");
    }

    let filter = BookFilter::new(10, 0).with_genre_id(1);
    for book in books.find_books(&filter).await? {
        tracing::info!(?book, "filtered book");
    }

    Ok(())
}
