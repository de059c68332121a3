//! SQLite database service
//!
//! Executes compiled user filters. Owns the connection pool and the schema;
//! repositories are free functions over `&SqlitePool`.

pub mod error;
mod placeholders;
pub mod repositories;
pub mod schema;

pub use error::SqliteError;
pub use placeholders::to_sqlite_placeholders;
pub use sqlx::SqlitePool;

use std::str::FromStr;
use std::time::Duration;

use sqlx::ConnectOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::log::LevelFilter;

use crate::core::constants::{SQLITE_BUSY_TIMEOUT_SECS, SQLITE_MAX_CONNECTIONS};

/// SQLite database service
pub struct SqliteService {
    pool: SqlitePool,
}

impl SqliteService {
    /// Connect to a SQLite database URL and apply the schema
    ///
    /// The database file is created if it doesn't exist.
    pub async fn connect(url: &str) -> Result<Self, SqliteError> {
        if !url.starts_with("sqlite:") {
            return Err(SqliteError::InvalidUrl {
                url: url.to_string(),
                reason: "expected a sqlite: URL".to_string(),
            });
        }

        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| SqliteError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            })?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(SQLITE_BUSY_TIMEOUT_SECS))
            .log_statements(LevelFilter::Trace);

        let pool = SqlitePoolOptions::new()
            .max_connections(SQLITE_MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        schema::apply(&pool).await?;

        tracing::debug!(%url, "SqliteService initialized");
        Ok(Self { pool })
    }

    /// Open a private in-memory database
    ///
    /// Every SQLite connection to `:memory:` gets its own database, so the pool
    /// is pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self, SqliteError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?
            .log_statements(LevelFilter::Trace);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        schema::apply(&pool).await?;

        tracing::debug!("In-memory SqliteService initialized");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("SQLite pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_creates_users_table() {
        let service = SqliteService::in_memory().await.unwrap();
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM Users")
            .fetch_one(service.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_schema_version_recorded() {
        let service = SqliteService::in_memory().await.unwrap();
        let (version,): (i32,) = sqlx::query_as("SELECT version FROM schema_version WHERE id = 1")
            .fetch_one(service.pool())
            .await
            .unwrap();
        assert_eq!(version, schema::SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_schema_apply_is_idempotent() {
        let service = SqliteService::in_memory().await.unwrap();
        schema::apply(service.pool()).await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("users.db").display());
        let service = SqliteService::connect(&url).await.unwrap();
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM Users")
            .fetch_one(service.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
        service.close().await;
    }

    #[tokio::test]
    async fn test_connect_invalid_url() {
        let result = SqliteService::connect("postgres://localhost/users").await;
        assert!(matches!(result, Err(SqliteError::InvalidUrl { .. })));
    }
}
