use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use super::MIGRATION_001_KEY_VALUE;

/// A stored value together with the time it was last written.
#[derive(Debug, Clone)]
pub struct StoredValue {
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Key/value blob store backed by a single SQLite table.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations. Safe to run on every start.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_KEY_VALUE)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Open the database file at `path`, creating it when absent, and migrate.
    pub async fn open(path: &str) -> Result<Self> {
        let repo = Self::connect(&format!("sqlite:{}?mode=rwc", path)).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Read the value stored under `key`.
    pub async fn get(&self, key: &str) -> Result<Option<StoredValue>> {
        let row = sqlx::query("SELECT value, updated_at FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to read key '{}'", key))?;

        row.map(|row| Self::row_to_value(&row)).transpose()
    }

    /// Store `value` under `key`, replacing any prior value.
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to write key '{}'", key))?;
        Ok(())
    }

    /// Delete `key`. Returns whether a value was present.
    pub async fn remove(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete key '{}'", key))?;
        Ok(result.rows_affected() > 0)
    }

    /// List all stored keys in lexical order.
    pub async fn keys(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list keys")?;

        Ok(rows.iter().map(|row| row.get::<String, _>("key")).collect())
    }

    fn row_to_value(row: &sqlx::sqlite::SqliteRow) -> Result<StoredValue> {
        let updated_at_str: String = row.get("updated_at");

        Ok(StoredValue {
            value: row.get("value"),
            updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
                .context("Invalid updated_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}
