use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::Post;

const LOCK_NOT_AVAILABLE: &str = "55P03";
const DEADLOCK_DETECTED: &str = "40P01";

#[derive(Debug, Clone, Copy)]
pub(crate) struct TransactionTimeouts {
    pub(crate) update: Duration,
    pub(crate) delete: Duration,
}

impl Default for TransactionTimeouts {
    fn default() -> Self {
        Self {
            update: Duration::from_secs(10),
            delete: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
    timeouts: TransactionTimeouts,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool, timeouts: TransactionTimeouts) -> Self {
        Self { pool, timeouts }
    }

    /// READ COMMITTED transaction whose lock waits and statements are bounded by `timeout`.
    async fn begin_bounded(
        &self,
        timeout: Duration,
    ) -> Result<Transaction<'static, Postgres>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_post_db_error)?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL READ COMMITTED")
            .execute(&mut *tx)
            .await
            .map_err(map_post_db_error)?;

        let timeout_ms = format!("{}ms", timeout.as_millis());
        sqlx::query(
            r#"
            SELECT
                set_config('lock_timeout', $1, true),
                set_config('statement_timeout', $1, true)
            "#,
        )
        .bind(&timeout_ms)
        .execute(&mut *tx)
        .await
        .map_err(map_post_db_error)?;

        Ok(tx)
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    content: String,
    cover_image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (title, content, cover_image)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, cover_image, created_at, updated_at
            "#,
        )
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.cover_image)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        map_row_to_post(row)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
            id,
            title,
            content,
            cover_image,
            created_at,
            updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        let mut tx = self.begin_bounded(self.timeouts.update).await?;

        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_post_db_error)?;

        if exists.is_none() {
            debug!(post_id = id, "update skipped, post no longer exists");
            tx.rollback().await.map_err(map_post_db_error)?;
            return Ok(None);
        }

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                cover_image = COALESCE($4, cover_image),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, content, cover_image, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.content)
        .bind(&patch.cover_image)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_post_db_error)?;

        tx.commit().await.map_err(map_post_db_error)?;

        map_row_to_post(row).map(Some)
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let mut tx = self.begin_bounded(self.timeouts.delete).await?;

        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_post_db_error)?;

        if exists.is_none() {
            tx.rollback().await.map_err(map_post_db_error)?;
            return Ok(false);
        }

        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(map_post_db_error)?;

        tx.commit().await.map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                id,
                title,
                content,
                cover_image,
                created_at,
                updated_at
            FROM posts
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_post).collect()
    }
}

fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    Post::new(
        row.id,
        row.title,
        row.content,
        row.cover_image,
        row.created_at,
        row.updated_at,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) => {
            map_sqlstate(db_err.code().as_deref(), db_err.message())
        }
        _ => DomainError::Unexpected(err.to_string()),
    }
}

/// Lock waits and deadlocks are retryable, every other database error is terminal.
fn map_sqlstate(code: Option<&str>, message: &str) -> DomainError {
    match code {
        Some(LOCK_NOT_AVAILABLE) | Some(DEADLOCK_DETECTED) => {
            DomainError::LockTimeout(message.to_string())
        }
        _ => DomainError::Unexpected(message.to_string()),
    }
}
