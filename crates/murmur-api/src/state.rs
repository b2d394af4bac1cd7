//! Application state wiring the history store, service and session hub.
//!
//! The core types are generic over their store and sink; AppState pins them
//! to the SQLite store and the channel sink the WebSocket transport drains.

use std::sync::Arc;

use anyhow::Context;
use murmur_core::history::HistoryService;
use murmur_core::hub::{ChannelSink, SessionHub};
use murmur_infra::sqlite::{DatabasePool, SqliteHistoryStore};
use murmur_types::config::ServerConfig;

pub type ConcreteHistoryService = HistoryService<SqliteHistoryStore>;

pub type ConcreteHub = SessionHub<SqliteHistoryStore, ChannelSink>;

/// Shared application state, cloned into every handler.
///
/// The hub and the HTTP history endpoint share one `HistoryService`.
#[derive(Clone)]
pub struct AppState {
    pub history: Arc<ConcreteHistoryService>,
    pub hub: Arc<ConcreteHub>,
    pub config: Arc<ServerConfig>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Connect to the database and wire the services.
    ///
    /// Fails if the database cannot be opened; the server must not start
    /// with a degraded store.
    pub async fn init(config: ServerConfig) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(&config.database_url)
            .await
            .with_context(|| format!("failed to connect to database `{}`", config.database_url))?;
        tracing::info!("database connected");

        Ok(Self::with_pool(db_pool, config))
    }

    /// Wire the services on top of an already connected pool.
    pub fn with_pool(db_pool: DatabasePool, config: ServerConfig) -> Self {
        let store = SqliteHistoryStore::new(db_pool.clone());
        let history = Arc::new(HistoryService::new(store, config.history_limit));
        let hub = Arc::new(SessionHub::new(history.clone()));

        Self {
            history,
            hub,
            config: Arc::new(config),
            db_pool,
        }
    }

    /// Close the database pools.
    pub async fn close(&self) {
        self.db_pool.close().await;
    }
}
