//! Database pool with split reader/writer connections in WAL mode.
//!
//! SQLite allows only one writer at a time. `DatabasePool` pairs a
//! multi-connection reader pool for history queries with a single-connection
//! writer pool for appends. Connecting eagerly opens both pools, so an
//! unreachable database fails at startup rather than on the first request.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Split read/write pool for SQLite with WAL mode.
///
/// - `reader`: Multi-connection pool (up to 8) for concurrent SELECT queries.
/// - `writer`: Single-connection pool for serialized INSERTs.
#[derive(Clone, Debug)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open the database, creating the file if needed, and run the embedded
    /// migrations. Used by the server.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        Self::connect(database_url, true).await
    }

    /// Open a database that must already exist.
    ///
    /// Fails instead of creating an empty file, whatever `mode` the URL
    /// carries. Used by one-shot commands that only read history.
    pub async fn open_existing(database_url: &str) -> Result<Self, sqlx::Error> {
        Self::connect(database_url, false).await
    }

    async fn connect(database_url: &str, create: bool) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(create);

        // The writer must exist and be migrated before readers attach.
        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await?;
        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options.read_only(true))
            .await?;

        tracing::debug!(url = %database_url, "database pools open");
        Ok(Self { reader, writer })
    }

    /// Close both pools, waiting for in-flight queries to finish.
    pub async fn close(&self) {
        self.writer.close().await;
        self.reader.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_url(dir: &tempfile::TempDir, name: &str) -> String {
        format!("sqlite://{}?mode=rwc", dir.path().join(name).display())
    }

    #[tokio::test]
    async fn test_pool_creates_chat_messages_table() {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::new(&temp_url(&dir, "test.db")).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' ORDER BY name",
        )
        .fetch_all(&pool.reader)
        .await
        .unwrap();

        let table_names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert_eq!(table_names, vec!["chat_messages"]);
    }

    #[tokio::test]
    async fn test_pool_wal_mode() {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::new(&temp_url(&dir, "test_wal.db")).await.unwrap();

        let result: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool.writer)
            .await
            .unwrap();

        assert_eq!(result.0.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn test_pool_reopens_existing_database() {
        let dir = tempfile::tempdir().unwrap();
        let url = temp_url(&dir, "reopen.db");

        let first = DatabasePool::new(&url).await.unwrap();
        first.close().await;

        assert!(DatabasePool::new(&url).await.is_ok());
    }

    #[tokio::test]
    async fn test_pool_unreachable_database_fails() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("missing-dir").join("chat.db").display()
        );

        assert!(DatabasePool::new(&url).await.is_err());
    }

    #[tokio::test]
    async fn test_open_existing_refuses_to_create() {
        let dir = tempfile::tempdir().unwrap();
        let url = temp_url(&dir, "typo.db");

        assert!(DatabasePool::open_existing(&url).await.is_err());
        assert!(!dir.path().join("typo.db").exists());

        DatabasePool::new(&url).await.unwrap().close().await;
        assert!(DatabasePool::open_existing(&url).await.is_ok());
    }
}
