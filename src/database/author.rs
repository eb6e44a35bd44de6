use crate::database::acquire;
use crate::models::{Author, StorageError};
use crate::repositories::AuthorRepository;
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection, SqlitePool};

const FIND_ALL_SQL: &str = "SELECT id, author_name FROM author";
const FIND_BY_ID_SQL: &str = "SELECT id, author_name FROM author WHERE id = ?";
const CHECK_UNIQUE_SQL: &str = "SELECT id FROM author WHERE author_name = ?";
const SAVE_SQL: &str = "INSERT INTO author (author_name) VALUES (?) RETURNING id";
const UPDATE_SQL: &str = "UPDATE author SET author_name = ? WHERE id = ?";
const DELETE_SQL: &str = "DELETE FROM author WHERE id = ?";

#[derive(Debug, Clone)]
pub struct DefaultAuthorRepository {
    pool: SqlitePool,
}

impl DefaultAuthorRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Looks up an author on a connection the caller already holds, such as
    /// one borrowed from an open transaction.
    pub async fn find_author_on(
        &self,
        id: i32,
        conn: &mut SqliteConnection,
    ) -> Result<Option<Author>, StorageError> {
        let author = sqlx::query_as(FIND_BY_ID_SQL)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .with_context(|| format!(r#"Failed to retrieve author with id "{id}""#))?;

        Ok(author)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Author {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id = row.try_get("id")?;
        let name = row.try_get("author_name")?;

        Ok(Self::with_id(id, name))
    }
}

#[async_trait]
impl AuthorRepository for DefaultAuthorRepository {
    async fn find_author(&self, id: i32) -> Result<Option<Author>, StorageError> {
        let mut conn = acquire(&self.pool).await?;
        self.find_author_on(id, &mut conn).await
    }

    async fn find_all_authors(&self) -> Result<Vec<Author>, StorageError> {
        let authors = sqlx::query_as(FIND_ALL_SQL)
            .fetch_all(&self.pool)
            .await
            .context("Failed to retrieve all authors")?;

        Ok(authors)
    }

    async fn save_author(&self, mut author: Author) -> Result<Author, StorageError> {
        let mut conn = acquire(&self.pool).await?;

        let existing: Option<i32> = sqlx::query_scalar(CHECK_UNIQUE_SQL)
            .bind(author.name())
            .fetch_optional(&mut *conn)
            .await
            .with_context(|| {
                format!(r#"Failed to check uniqueness of author "{}""#, author.name())
            })?;

        if let Some(existing) = existing {
            tracing::debug!(name = author.name(), existing, "author already exists, skipping insert");
            return Ok(author);
        }

        let id: i32 = sqlx::query_scalar(SAVE_SQL)
            .bind(author.name())
            .fetch_one(&mut *conn)
            .await
            .with_context(|| {
                format!(r#"Failed to create author with name "{}""#, author.name())
            })?;
        author.set_id(id);

        Ok(author)
    }

    async fn update_author(&self, author: &Author) -> Result<(), StorageError> {
        let id = author.id().ok_or_else(|| {
            anyhow!(
                r#"Cannot update author "{}" that has not been saved"#,
                author.name()
            )
        })?;

        sqlx::query(UPDATE_SQL)
            .bind(author.name())
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!(r#"Failed to update author with id "{id}""#))?;

        Ok(())
    }

    async fn delete_author(&self, id: i32) -> Result<bool, StorageError> {
        let result = sqlx::query(DELETE_SQL)
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!(r#"Failed to delete author with id "{id}""#))?;

        Ok(result.rows_affected() > 0)
    }
}
