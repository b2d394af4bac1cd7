//! SQLite storage layer.
//!
//! History store backed by SQLite with WAL mode and split read/write
//! connection pools.

pub mod history;
pub mod pool;

pub use history::SqliteHistoryStore;
pub use pool::DatabasePool;
