use crate::database::{DefaultAuthorRepository, DefaultGenreRepository, acquire};
use crate::models::{Book, BookFilter, StorageError};
use crate::repositories::BookRepository;
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection, SqlitePool};

const FIND_ALL_SQL: &str = "SELECT id, name, author_id, genre_id, isbn FROM book";
const FIND_BY_ID_SQL: &str = "SELECT id, name, author_id, genre_id, isbn FROM book WHERE id = ?";
const CHECK_UNIQUE_SQL: &str = "SELECT book.id FROM book \
    JOIN author ON author.id = book.author_id \
    WHERE book.name = ? AND author.author_name = ?";
const SAVE_SQL: &str =
    "INSERT INTO book (name, author_id, genre_id, isbn) VALUES (?, ?, ?, ?) RETURNING id";
const UPDATE_SQL: &str =
    "UPDATE book SET name = ?, author_id = ?, genre_id = ?, isbn = ? WHERE id = ?";
const DELETE_SQL: &str = "DELETE FROM book WHERE id = ?";

/// A `book` row before its author and genre are resolved.
#[derive(Debug)]
struct BookRow {
    id: i32,
    name: String,
    author_id: i32,
    genre_id: i32,
    isbn: String,
}

impl<'r> FromRow<'r, SqliteRow> for BookRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            author_id: row.try_get("author_id")?,
            genre_id: row.try_get("genre_id")?,
            isbn: row.try_get("isbn")?,
        })
    }
}

/// Book storage. Every book read also loads its author and genre, on the
/// same connection that produced the book row.
#[derive(Debug, Clone)]
pub struct DefaultBookRepository {
    pool: SqlitePool,
    authors: DefaultAuthorRepository,
    genres: DefaultGenreRepository,
}

impl DefaultBookRepository {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            authors: DefaultAuthorRepository::new(pool.clone()),
            genres: DefaultGenreRepository::new(pool.clone()),
            pool,
        }
    }

    async fn build_book(
        &self,
        row: BookRow,
        conn: &mut SqliteConnection,
    ) -> Result<Book, StorageError> {
        let author = self
            .authors
            .find_author_on(row.author_id, conn)
            .await?
            .ok_or_else(|| {
                anyhow!(
                    r#"Book with id "{}" references missing author "{}""#,
                    row.id,
                    row.author_id
                )
            })?;
        let genre = self
            .genres
            .find_genre_on(row.genre_id, conn)
            .await?
            .ok_or_else(|| {
                anyhow!(
                    r#"Book with id "{}" references missing genre "{}""#,
                    row.id,
                    row.genre_id
                )
            })?;

        Ok(Book::with_id(row.id, row.name, author, genre, row.isbn))
    }

    async fn build_books(
        &self,
        rows: Vec<BookRow>,
        conn: &mut SqliteConnection,
    ) -> Result<Vec<Book>, StorageError> {
        let mut books = Vec::with_capacity(rows.len());
        for row in rows {
            books.push(self.build_book(row, conn).await?);
        }

        Ok(books)
    }
}

/// Assembles the filtered listing query and the LIKE patterns to bind
/// ahead of `LIMIT` and `OFFSET`.
fn filtered_query(filter: &BookFilter) -> (String, Vec<String>) {
    let mut conditions = Vec::new();
    let mut patterns = Vec::new();

    if let Some(author_id) = filter.author_id() {
        conditions.push("CAST(author_id AS TEXT) LIKE ?");
        patterns.push(format!("%{author_id}%"));
    }
    if let Some(genre_id) = filter.genre_id() {
        conditions.push("CAST(genre_id AS TEXT) LIKE ?");
        patterns.push(format!("%{genre_id}%"));
    }

    let mut sql = String::from(FIND_ALL_SQL);
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push_str(" ORDER BY id LIMIT ? OFFSET ?");

    (sql, patterns)
}

#[async_trait]
impl BookRepository for DefaultBookRepository {
    async fn find_book(&self, id: i32) -> Result<Option<Book>, StorageError> {
        let mut conn = acquire(&self.pool).await?;

        let row: Option<BookRow> = sqlx::query_as(FIND_BY_ID_SQL)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .with_context(|| format!(r#"Failed to retrieve book with id "{id}""#))?;

        match row {
            Some(row) => Ok(Some(self.build_book(row, &mut conn).await?)),
            None => Ok(None),
        }
    }

    async fn find_all_books(&self) -> Result<Vec<Book>, StorageError> {
        let mut conn = acquire(&self.pool).await?;

        let rows: Vec<BookRow> = sqlx::query_as(FIND_ALL_SQL)
            .fetch_all(&mut *conn)
            .await
            .context("Failed to retrieve all books")?;

        self.build_books(rows, &mut conn).await
    }

    async fn find_books(&self, filter: &BookFilter) -> Result<Vec<Book>, StorageError> {
        let (sql, patterns) = filtered_query(filter);
        let mut conn = acquire(&self.pool).await?;

        let mut query = sqlx::query_as::<_, BookRow>(&sql);
        for pattern in patterns {
            query = query.bind(pattern);
        }

        let rows = query
            .bind(i64::from(filter.limit()))
            .bind(i64::from(filter.offset()))
            .fetch_all(&mut *conn)
            .await
            .context("Failed to retrieve filtered books")?;

        let books = self.build_books(rows, &mut conn).await?;
        tracing::debug!(count = books.len(), ?filter, "listed filtered books");

        Ok(books)
    }

    async fn save_book(&self, mut book: Book) -> Result<Book, StorageError> {
        let author_id = book.author().id().ok_or_else(|| {
            anyhow!(r#"Book "{}" references an unsaved author"#, book.name())
        })?;
        let genre_id = book.genre().id().ok_or_else(|| {
            anyhow!(r#"Book "{}" references an unsaved genre"#, book.name())
        })?;

        let mut conn = acquire(&self.pool).await?;

        let existing: Option<i32> = sqlx::query_scalar(CHECK_UNIQUE_SQL)
            .bind(book.name())
            .bind(book.author().name())
            .fetch_optional(&mut *conn)
            .await
            .with_context(|| format!(r#"Failed to check uniqueness of book "{}""#, book.name()))?;

        if let Some(existing) = existing {
            tracing::debug!(
                name = book.name(),
                author = book.author().name(),
                existing,
                "book already exists, skipping insert"
            );
            return Ok(book);
        }

        let id: i32 = sqlx::query_scalar(SAVE_SQL)
            .bind(book.name())
            .bind(author_id)
            .bind(genre_id)
            .bind(book.isbn())
            .fetch_one(&mut *conn)
            .await
            .with_context(|| format!(r#"Failed to create book with name "{}""#, book.name()))?;
        book.set_id(id);

        Ok(book)
    }

    async fn update_book(&self, book: &Book) -> Result<(), StorageError> {
        let id = book.id().ok_or_else(|| {
            anyhow!(r#"Cannot update book "{}" that has not been saved"#, book.name())
        })?;
        let author_id = book.author().id().ok_or_else(|| {
            anyhow!(r#"Book with id "{id}" references an unsaved author"#)
        })?;
        let genre_id = book.genre().id().ok_or_else(|| {
            anyhow!(r#"Book with id "{id}" references an unsaved genre"#)
        })?;

        sqlx::query(UPDATE_SQL)
            .bind(book.name())
            .bind(author_id)
            .bind(genre_id)
            .bind(book.isbn())
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!(r#"Failed to update book with id "{id}""#))?;

        Ok(())
    }

    async fn delete_book(&self, id: i32) -> Result<bool, StorageError> {
        let result = sqlx::query(DELETE_SQL)
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!(r#"Failed to delete book with id "{id}""#))?;

        Ok(result.rows_affected() > 0)
    }
}
