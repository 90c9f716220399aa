//! Append-only summary store
//!
//! One table, one row per upload. The current summary is the most recently
//! inserted row; nothing is ever updated or deleted.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

use crate::config::DatabaseConfig;

/// A stored upload: the version label and the summary exactly as received
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct StoredSummary {
    pub version: String,
    pub summary: String,
}

#[derive(Debug, Clone)]
pub struct SummaryStore {
    pool: SqlitePool,
}

impl SummaryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the pool described by `config` and bring the schema up to date
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Append a summary; it becomes the current one
    #[tracing::instrument(skip(self, summary), fields(bytes = summary.len()))]
    pub async fn insert(&self, version: &str, summary: &str) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO pronom (version, summary) VALUES (?1, ?2)")
            .bind(version)
            .bind(summary)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// The most recently inserted summary, if any
    pub async fn latest(&self) -> Result<Option<StoredSummary>, sqlx::Error> {
        sqlx::query_as::<_, StoredSummary>(
            "SELECT version, summary FROM pronom ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
    }

    /// Database round-trip for health checks
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> SummaryStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = SummaryStore::new(pool);
        store.migrate().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_empty_store_has_no_latest() {
        let store = memory_store().await;
        assert_eq!(store.latest().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_latest_row_wins() {
        let store = memory_store().await;
        store.insert("V115", r#"{"version":"V115"}"#).await.unwrap();
        store.insert("V116", r#"{"version":"V116"}"#).await.unwrap();

        let latest = store.latest().await.unwrap().unwrap();
        assert_eq!(latest.version, "V116");
        assert_eq!(latest.summary, r#"{"version":"V116"}"#);
    }

    #[tokio::test]
    async fn test_quotes_are_stored_verbatim() {
        let store = memory_store().await;
        let summary = r#"{"version":"V116","records":[{"name":"Lotus 1-2-3 Worksheet 'WK1'"}]}"#;
        store.insert("V116", summary).await.unwrap();

        assert_eq!(store.latest().await.unwrap().unwrap().summary, summary);
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let store = memory_store().await;
        store.migrate().await.unwrap();
        store.ping().await.unwrap();
    }
}
