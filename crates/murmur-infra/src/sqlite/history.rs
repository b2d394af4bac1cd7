//! SQLite history store implementation.
//!
//! Implements `HistoryStore` from `murmur-core` using sqlx with split
//! read/write pools: appends go through the single writer connection,
//! history queries through the reader pool.

use chrono::DateTime;
use murmur_core::history::HistoryStore;
use murmur_types::chat::{ChatMessage, NewChatMessage};
use murmur_types::error::StoreError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `HistoryStore`.
#[derive(Clone, Debug)]
pub struct SqliteHistoryStore {
    pool: DatabasePool,
}

impl SqliteHistoryStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

struct ChatMessageRow {
    id: String,
    username: String,
    message: String,
    timestamp: i64,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            message: row.try_get("message")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::Query(format!("invalid message id: {e}")))?;
        let timestamp = DateTime::from_timestamp_micros(self.timestamp)
            .ok_or_else(|| StoreError::Query(format!("invalid timestamp: {}", self.timestamp)))?;

        Ok(ChatMessage {
            id,
            username: self.username,
            message: self.message,
            timestamp,
        })
    }
}

/// Connectivity failures become `Unavailable`; everything else is a query error.
fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::PoolClosed
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::Io(_)
        | sqlx::Error::WorkerCrashed => StoreError::Unavailable(e.to_string()),
        _ => StoreError::Query(e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// HistoryStore implementation
// ---------------------------------------------------------------------------

impl HistoryStore for SqliteHistoryStore {
    async fn append(&self, message: NewChatMessage) -> Result<ChatMessage, StoreError> {
        let stored = message.stamp();

        sqlx::query(
            "INSERT INTO chat_messages (id, username, message, timestamp) VALUES (?, ?, ?, ?)",
        )
        .bind(stored.id.to_string())
        .bind(&stored.username)
        .bind(&stored.message)
        .bind(stored.timestamp.timestamp_micros())
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(stored)
    }

    async fn recent_messages(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        // Newest first so LIMIT keeps the tail, then flip for presentation.
        let rows = sqlx::query(
            "SELECT id, username, message, timestamp FROM chat_messages
             ORDER BY timestamp DESC, rowid DESC
             LIMIT ?",
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row = ChatMessageRow::from_row(row).map_err(map_sqlx_error)?;
            messages.push(msg_row.into_message()?);
        }
        messages.reverse();

        Ok(messages)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chat_messages")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;
        Ok(count as u64)
    }
}
