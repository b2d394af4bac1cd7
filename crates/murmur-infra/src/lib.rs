//! Infrastructure layer for murmur.
//!
//! Contains the SQLite implementation of the `HistoryStore` port defined in
//! `murmur-core`, and the `murmur.toml` configuration loader.

pub mod config;
pub mod sqlite;
