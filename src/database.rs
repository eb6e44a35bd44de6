mod author;
mod book;
mod genre;

pub use author::DefaultAuthorRepository;
pub use book::DefaultBookRepository;
pub use genre::DefaultGenreRepository;

use crate::models::StorageError;
use anyhow::Context;
use sqlx::migrate::Migrator;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sqlx::{Sqlite, SqlitePool};
use std::str::FromStr;

static MIGRATOR: Migrator = sqlx::migrate!();

/// Opens the catalog database and applies pending migrations.
pub async fn establish_pool(path: &str) -> anyhow::Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(path)
        .with_context(|| format!("Invalid database path {path}"))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);
    let pool = SqlitePool::connect_with(opts)
        .await
        .with_context(|| format!("Failed to open database at {path}"))?;

    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to migrate catalog schema")?;

    Ok(pool)
}

async fn acquire(pool: &SqlitePool) -> Result<PoolConnection<Sqlite>, StorageError> {
    let conn = pool
        .acquire()
        .await
        .context("Failed to acquire database connection")?;
    Ok(conn)
}
