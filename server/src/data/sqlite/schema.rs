//! SQLite schema definitions

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL
///
/// Column names match the identifiers accepted by the user filter allow-list.
/// `LastLoginAt` holds `YYYY-MM-DDTHH:MM:SSZ` text so that range comparisons
/// against filter timestamps order correctly.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS Users (
    Id TEXT PRIMARY KEY,
    Username TEXT NOT NULL UNIQUE CHECK(length(Username) >= 1 AND length(Username) <= 256),
    Email TEXT NOT NULL CHECK(length(Email) <= 320),
    PasswordHash TEXT NOT NULL,
    LastLoginAt TEXT,
    Active INTEGER NOT NULL DEFAULT 1 CHECK(Active IN (0, 1))
);

CREATE INDEX IF NOT EXISTS idx_users_email ON Users(Email);
CREATE INDEX IF NOT EXISTS idx_users_last_login ON Users(LastLoginAt);
"#;

/// Apply the schema and record its version
pub async fn apply(pool: &sqlx::SqlitePool) -> Result<(), super::SqliteError> {
    let mut tx = pool.begin().await?;

    sqlx::query(SCHEMA)
        .execute(&mut *tx)
        .await
        .map_err(|e| super::SqliteError::SchemaFailed {
            version: SCHEMA_VERSION,
            error: e.to_string(),
        })?;

    sqlx::query(
        "INSERT INTO schema_version (id, version, applied_at) VALUES (1, ?, ?)
         ON CONFLICT(id) DO UPDATE SET version = excluded.version",
    )
    .bind(SCHEMA_VERSION)
    .bind(chrono::Utc::now().timestamp())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::debug!(version = SCHEMA_VERSION, "Schema applied");
    Ok(())
}
