//! In-process history store.
//!
//! Keeps messages in a `Vec` behind a `tokio::sync::RwLock`. Nothing is
//! persisted across restarts. The store can be switched to "unavailable"
//! to exercise failure paths without a real database.

use std::sync::atomic::{AtomicBool, Ordering};

use murmur_types::chat::{ChatMessage, NewChatMessage};
use murmur_types::error::StoreError;
use tokio::sync::RwLock;

use crate::history::store::HistoryStore;

/// Memory-backed implementation of `HistoryStore`.
#[derive(Debug)]
pub struct InMemoryHistoryStore {
    messages: RwLock<Vec<ChatMessage>>,
    available: AtomicBool,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self {
            messages: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Toggle simulated connectivity. While unavailable every operation
    /// fails with `StoreError::Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store is offline".to_string()))
        }
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for InMemoryHistoryStore {
    async fn append(&self, message: NewChatMessage) -> Result<ChatMessage, StoreError> {
        self.check_available()?;
        let mut messages = self.messages.write().await;
        let stored = message.stamp();
        messages.push(stored.clone());
        Ok(stored)
    }

    async fn recent_messages(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        self.check_available()?;
        let mut messages = self.messages.read().await.clone();
        // Stable sort: equal timestamps keep insertion order.
        messages.sort_by_key(|m| m.timestamp);
        let skip = messages.len().saturating_sub(limit);
        Ok(messages.split_off(skip))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.check_available()?;
        Ok(self.messages.read().await.len() as u64)
    }
}
