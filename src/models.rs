use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of any storage operation. Wraps the driver error with context.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct StorageError(#[from] pub anyhow::Error);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    id: Option<i32>,
    name: String,
}

impl Author {
    /// Creates an author that has not been stored yet.
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    pub const fn with_id(id: i32, name: String) -> Self {
        Self { id: Some(id), name }
    }

    pub const fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn set_id(&mut self, id: i32) {
        self.id = Some(id);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.into();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    id: Option<i32>,
    name: String,
}

impl Genre {
    /// Creates a genre that has not been stored yet.
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    pub const fn with_id(id: i32, name: String) -> Self {
        Self { id: Some(id), name }
    }

    pub const fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn set_id(&mut self, id: i32) {
        self.id = Some(id);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.into();
    }
}

/// A book with its author and genre loaded eagerly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    id: Option<i32>,
    name: String,
    author: Author,
    genre: Genre,
    isbn: String,
}

impl Book {
    pub fn new(name: &str, author: Author, genre: Genre, isbn: &str) -> Self {
        Self {
            id: None,
            name: name.into(),
            author,
            genre,
            isbn: isbn.into(),
        }
    }

    pub const fn with_id(id: i32, name: String, author: Author, genre: Genre, isbn: String) -> Self {
        Self {
            id: Some(id),
            name,
            author,
            genre,
            isbn,
        }
    }

    pub const fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn set_id(&mut self, id: i32) {
        self.id = Some(id);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.into();
    }

    pub const fn author(&self) -> &Author {
        &self.author
    }

    pub fn set_author(&mut self, author: Author) {
        self.author = author;
    }

    pub const fn genre(&self) -> &Genre {
        &self.genre
    }

    pub fn set_genre(&mut self, genre: Genre) {
        self.genre = genre;
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn set_isbn(&mut self, isbn: &str) {
        self.isbn = isbn.into();
    }
}

/// Pagination and optional author/genre constraints for listing books.
///
/// The id constraints match by substring of the id's decimal text, so an
/// author id of `1` also selects books by authors `11` and `21`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFilter {
    limit: u32,
    offset: u32,
    author_id: Option<i32>,
    genre_id: Option<i32>,
}

impl BookFilter {
    pub const fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit,
            offset,
            author_id: None,
            genre_id: None,
        }
    }

    #[must_use]
    pub const fn with_author_id(self, author_id: i32) -> Self {
        Self {
            author_id: Some(author_id),
            ..self
        }
    }

    #[must_use]
    pub const fn with_genre_id(self, genre_id: i32) -> Self {
        Self {
            genre_id: Some(genre_id),
            ..self
        }
    }

    pub const fn limit(&self) -> u32 {
        self.limit
    }

    pub const fn offset(&self) -> u32 {
        self.offset
    }

    pub const fn author_id(&self) -> Option<i32> {
        self.author_id
    }

    pub const fn genre_id(&self) -> Option<i32> {
        self.genre_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_records_have_no_id() {
        assert_eq!(Author::new("Tolkien").id(), None);
        assert_eq!(Genre::new("Fantasy").id(), None);
    }

    #[test]
    fn filter_builder_keeps_pagination() {
        let filter = BookFilter::new(10, 20).with_author_id(3).with_genre_id(4);

        assert_eq!(filter.limit(), 10);
        assert_eq!(filter.offset(), 20);
        assert_eq!(filter.author_id(), Some(3));
        assert_eq!(filter.genre_id(), Some(4));
    }

    #[test]
    fn storage_error_displays_context() {
        let err = StorageError::from(anyhow::anyhow!("disk full").context("Failed to save author"));
        assert_eq!(err.to_string(), "Failed to save author");
    }
}
