//! HistoryStore trait definition.

use murmur_types::chat::{ChatMessage, NewChatMessage};
use murmur_types::error::StoreError;

/// Append-only log of chat messages, queryable by recency.
///
/// Implementations live in murmur-infra (e.g., `SqliteHistoryStore`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait HistoryStore: Send + Sync {
    /// Persist a validated message, assigning its id and timestamp.
    fn append(
        &self,
        message: NewChatMessage,
    ) -> impl std::future::Future<Output = Result<ChatMessage, StoreError>> + Send;

    /// Up to `limit` most recent messages, ordered oldest to newest.
    fn recent_messages(
        &self,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, StoreError>> + Send;

    /// Total number of stored messages.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;
}
