//! History service: validation in front of a `HistoryStore`.
//!
//! Untrusted payloads are validated before the store is touched, so a
//! rejected payload never reaches storage.

use murmur_types::chat::{ChatMessage, ChatPayload};
use murmur_types::error::ChatError;
use tracing::debug;

use crate::history::store::HistoryStore;

/// Validates and persists chat messages, and serves recent history.
///
/// Generic over `HistoryStore` (murmur-core never depends on murmur-infra).
pub struct HistoryService<S: HistoryStore> {
    store: S,
    history_limit: usize,
}

impl<S: HistoryStore> HistoryService<S> {
    /// Create a service returning at most `history_limit` messages from [`history`](Self::history).
    pub fn new(store: S, history_limit: usize) -> Self {
        Self {
            store,
            history_limit,
        }
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Validate an untrusted payload and persist it.
    pub async fn append(&self, payload: ChatPayload) -> Result<ChatMessage, ChatError> {
        let candidate = payload.validate()?;
        let stored = self.store.append(candidate).await?;
        debug!(id = %stored.id, username = %stored.username, "chat message stored");
        Ok(stored)
    }

    /// Up to `limit` most recent messages, oldest first.
    pub async fn recent_messages(&self, limit: usize) -> Result<Vec<ChatMessage>, ChatError> {
        Ok(self.store.recent_messages(limit).await?)
    }

    /// The most recent `history_limit` messages, oldest first.
    pub async fn history(&self) -> Result<Vec<ChatMessage>, ChatError> {
        self.recent_messages(self.history_limit).await
    }

    /// Total number of stored messages.
    pub async fn count(&self) -> Result<u64, ChatError> {
        Ok(self.store.count().await?)
    }
}
