use crate::models::{Author, Book, BookFilter, Genre, StorageError};
use async_trait::async_trait;

#[async_trait]
pub trait AuthorRepository: Send + Sync + 'static {
    async fn find_author(&self, id: i32) -> Result<Option<Author>, StorageError>;

    async fn find_all_authors(&self) -> Result<Vec<Author>, StorageError>;

    /// Stores a new author and returns it with its generated id.
    ///
    /// If an author with exactly the same name exists, nothing is inserted
    /// and the input comes back unchanged.
    async fn save_author(&self, author: Author) -> Result<Author, StorageError>;

    async fn update_author(&self, author: &Author) -> Result<(), StorageError>;

    /// Returns `true` when a row was removed.
    async fn delete_author(&self, id: i32) -> Result<bool, StorageError>;
}

#[async_trait]
pub trait GenreRepository: Send + Sync + 'static {
    async fn find_genre(&self, id: i32) -> Result<Option<Genre>, StorageError>;

    async fn find_all_genres(&self) -> Result<Vec<Genre>, StorageError>;

    /// Same duplicate policy as [`AuthorRepository::save_author`].
    async fn save_genre(&self, genre: Genre) -> Result<Genre, StorageError>;

    async fn update_genre(&self, genre: &Genre) -> Result<(), StorageError>;

    async fn delete_genre(&self, id: i32) -> Result<bool, StorageError>;
}

#[async_trait]
pub trait BookRepository: Send + Sync + 'static {
    async fn find_book(&self, id: i32) -> Result<Option<Book>, StorageError>;

    async fn find_all_books(&self) -> Result<Vec<Book>, StorageError>;

    async fn find_books(&self, filter: &BookFilter) -> Result<Vec<Book>, StorageError>;

    /// Stores a new book unless one with the same name by an author of the
    /// same name exists. The nested author and genre must already be stored.
    async fn save_book(&self, book: Book) -> Result<Book, StorageError>;

    async fn update_book(&self, book: &Book) -> Result<(), StorageError>;

    async fn delete_book(&self, id: i32) -> Result<bool, StorageError>;
}
