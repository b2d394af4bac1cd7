//! Chat history persistence abstractions.
//!
//! `HistoryStore` is the append-only storage port; `HistoryService` applies
//! validation on top of it. `InMemoryHistoryStore` backs tests.

pub mod memory;
pub mod service;
pub mod store;

pub use memory::InMemoryHistoryStore;
pub use service::HistoryService;
pub use store::HistoryStore;
