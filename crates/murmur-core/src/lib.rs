//! Chat history and broadcast logic for murmur.
//!
//! This crate defines the `HistoryStore` port that the infrastructure layer
//! implements, the `HistoryService` that validates and persists messages,
//! and the `SessionHub` that fans stored messages out to connected sessions.
//! It depends only on `murmur-types` -- never on `murmur-infra` or any
//! database/IO crate.

pub mod history;
pub mod hub;
