#![allow(dead_code)]

use library_catalog::database::{DefaultAuthorRepository, DefaultGenreRepository, establish_pool};
use library_catalog::models::{Author, Genre};
use library_catalog::repositories::{AuthorRepository, GenreRepository};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Opens a freshly migrated catalog in its own temporary directory. The
/// directory must outlive the pool.
pub async fn setup() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("catalog.db");
    let pool = establish_pool(&format!("sqlite://{}", path.display()))
        .await
        .expect("catalog database should open");
    (dir, pool)
}

pub async fn seed_author(pool: &SqlitePool, name: &str) -> Author {
    DefaultAuthorRepository::new(pool.clone())
        .save_author(Author::new(name))
        .await
        .expect("author should be saved")
}

pub async fn seed_genre(pool: &SqlitePool, name: &str) -> Genre {
    DefaultGenreRepository::new(pool.clone())
        .save_genre(Genre::new(name))
        .await
        .expect("genre should be saved")
}
