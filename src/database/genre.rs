use crate::database::acquire;
use crate::models::{Genre, StorageError};
use crate::repositories::GenreRepository;
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection, SqlitePool};

const FIND_ALL_SQL: &str = "SELECT id, genre_name FROM genre";
const FIND_BY_ID_SQL: &str = "SELECT id, genre_name FROM genre WHERE id = ?";
const CHECK_UNIQUE_SQL: &str = "SELECT id FROM genre WHERE genre_name = ?";
const SAVE_SQL: &str = "INSERT INTO genre (genre_name) VALUES (?) RETURNING id";
const UPDATE_SQL: &str = "UPDATE genre SET genre_name = ? WHERE id = ?";
const DELETE_SQL: &str = "DELETE FROM genre WHERE id = ?";

#[derive(Debug, Clone)]
pub struct DefaultGenreRepository {
    pool: SqlitePool,
}

impl DefaultGenreRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Same as [`GenreRepository::find_genre`], on a borrowed connection.
    pub async fn find_genre_on(
        &self,
        id: i32,
        conn: &mut SqliteConnection,
    ) -> Result<Option<Genre>, StorageError> {
        let genre = sqlx::query_as(FIND_BY_ID_SQL)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .with_context(|| format!(r#"Failed to retrieve genre with id "{id}""#))?;

        Ok(genre)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Genre {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id = row.try_get("id")?;
        let name = row.try_get("genre_name")?;

        Ok(Self::with_id(id, name))
    }
}

#[async_trait]
impl GenreRepository for DefaultGenreRepository {
    async fn find_genre(&self, id: i32) -> Result<Option<Genre>, StorageError> {
        let mut conn = acquire(&self.pool).await?;
        self.find_genre_on(id, &mut conn).await
    }

    async fn find_all_genres(&self) -> Result<Vec<Genre>, StorageError> {
        let genres = sqlx::query_as(FIND_ALL_SQL)
            .fetch_all(&self.pool)
            .await
            .context("Failed to retrieve all genres")?;

        Ok(genres)
    }

    async fn save_genre(&self, mut genre: Genre) -> Result<Genre, StorageError> {
        let mut conn = acquire(&self.pool).await?;

        let existing: Option<i32> = sqlx::query_scalar(CHECK_UNIQUE_SQL)
            .bind(genre.name())
            .fetch_optional(&mut *conn)
            .await
            .with_context(|| {
                format!(r#"Failed to check uniqueness of genre "{}""#, genre.name())
            })?;

        if let Some(existing) = existing {
            tracing::debug!(name = genre.name(), existing, "genre already exists, skipping insert");
            return Ok(genre);
        }

        let id: i32 = sqlx::query_scalar(SAVE_SQL)
            .bind(genre.name())
            .fetch_one(&mut *conn)
            .await
            .with_context(|| {
                format!(r#"Failed to create genre with name "{}""#, genre.name())
            })?;
        genre.set_id(id);

        Ok(genre)
    }

    async fn update_genre(&self, genre: &Genre) -> Result<(), StorageError> {
        let id = genre.id().ok_or_else(|| {
            anyhow!(
                r#"Cannot update genre "{}" that has not been saved"#,
                genre.name()
            )
        })?;

        sqlx::query(UPDATE_SQL)
            .bind(genre.name())
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!(r#"Failed to update genre with id "{id}""#))?;

        Ok(())
    }

    async fn delete_genre(&self, id: i32) -> Result<bool, StorageError> {
        let result = sqlx::query(DELETE_SQL)
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!(r#"Failed to delete genre with id "{id}""#))?;

        Ok(result.rows_affected() > 0)
    }
}
