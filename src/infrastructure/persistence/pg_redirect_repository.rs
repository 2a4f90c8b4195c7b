//! PostgreSQL implementation of the redirect repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{NewRedirect, Redirect};
use crate::domain::repositories::RedirectRepository;
use crate::error::{AppError, map_sqlx_error};

/// Default per-query deadline.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(sqlx::FromRow)]
struct RedirectRow {
    id: i64,
    short_key: String,
    active_destination: String,
    previous_destination: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RedirectRow> for Redirect {
    fn from(r: RedirectRow) -> Self {
        Redirect::new(
            r.id,
            r.short_key,
            r.active_destination,
            r.previous_destination,
            r.created_at,
            r.updated_at,
        )
    }
}

/// PostgreSQL repository for redirect records.
///
/// Every query runs under a deadline; a query that overruns it is reported as
/// [`AppError::Internal`] and never as a missing record.
pub struct PgRedirectRepository {
    pool: Arc<PgPool>,
    query_timeout: Duration,
}

impl PgRedirectRepository {
    /// Creates a new repository with the default query timeout.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self::with_timeout(pool, DEFAULT_QUERY_TIMEOUT)
    }

    pub fn with_timeout(pool: Arc<PgPool>, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn bounded<T, F>(&self, query: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => result.map_err(map_sqlx_error),
            Err(_) => {
                tracing::error!(
                    timeout_ms = self.query_timeout.as_millis() as u64,
                    "Database query timed out"
                );
                Err(AppError::internal(
                    "Database query timed out",
                    json!({ "timeout_ms": self.query_timeout.as_millis() as u64 }),
                ))
            }
        }
    }
}

const SELECT_COLUMNS: &str =
    "id, short_key, active_destination, previous_destination, created_at, updated_at";

#[async_trait]
impl RedirectRepository for PgRedirectRepository {
    async fn find_by_key(&self, key: &str) -> Result<Option<Redirect>, AppError> {
        if key.is_empty() {
            return Ok(None);
        }

        let sql = format!("SELECT {SELECT_COLUMNS} FROM redirects WHERE short_key = $1");
        let row = self
            .bounded(
                sqlx::query_as::<_, RedirectRow>(&sql)
                    .bind(key)
                    .fetch_optional(self.pool.as_ref()),
            )
            .await?;

        Ok(row.map(Redirect::from))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Redirect>, AppError> {
        if id < 1 {
            return Ok(None);
        }

        let sql = format!("SELECT {SELECT_COLUMNS} FROM redirects WHERE id = $1");
        let row = self
            .bounded(
                sqlx::query_as::<_, RedirectRow>(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_ref()),
            )
            .await?;

        Ok(row.map(Redirect::from))
    }

    async fn create(&self, new_redirect: NewRedirect) -> Result<Redirect, AppError> {
        let sql = format!(
            "INSERT INTO redirects (short_key, active_destination) VALUES ($1, $2) \
             RETURNING {SELECT_COLUMNS}"
        );
        let row = self
            .bounded(
                sqlx::query_as::<_, RedirectRow>(&sql)
                    .bind(&new_redirect.key)
                    .bind(&new_redirect.active_destination)
                    .fetch_one(self.pool.as_ref()),
            )
            .await?;

        Ok(row.into())
    }

    async fn list(
        &self,
        name: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Redirect>, AppError> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM redirects \
             WHERE ($1::text IS NULL OR strpos(lower(short_key), lower($1)) > 0) \
             ORDER BY id ASC LIMIT $2 OFFSET $3"
        );
        let rows = self
            .bounded(
                sqlx::query_as::<_, RedirectRow>(&sql)
                    .bind(name)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(self.pool.as_ref()),
            )
            .await?;

        Ok(rows.into_iter().map(Redirect::from).collect())
    }

    async fn count(&self, name: Option<String>) -> Result<i64, AppError> {
        self.bounded(
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM redirects \
                 WHERE ($1::text IS NULL OR strpos(lower(short_key), lower($1)) > 0)",
            )
            .bind(name)
            .fetch_one(self.pool.as_ref()),
        )
        .await
    }

    async fn update_destination(
        &self,
        id: i64,
        destination: String,
    ) -> Result<Option<Redirect>, AppError> {
        let sql = format!(
            "UPDATE redirects \
             SET previous_destination = active_destination, \
                 active_destination = $2, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {SELECT_COLUMNS}"
        );
        let row = self
            .bounded(
                sqlx::query_as::<_, RedirectRow>(&sql)
                    .bind(id)
                    .bind(destination)
                    .fetch_optional(self.pool.as_ref()),
            )
            .await?;

        Ok(row.map(Redirect::from))
    }

    async fn delete(&self, id: i64) -> Result<Option<Redirect>, AppError> {
        if id < 1 {
            return Ok(None);
        }

        let sql = format!("DELETE FROM redirects WHERE id = $1 RETURNING {SELECT_COLUMNS}");
        let row = self
            .bounded(
                sqlx::query_as::<_, RedirectRow>(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_ref()),
            )
            .await?;

        Ok(row.map(Redirect::from))
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.bounded(sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(self.pool.as_ref()))
            .await
            .map(|_| ())
    }
}
