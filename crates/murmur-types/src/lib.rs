//! Shared domain types for murmur.
//!
//! Chat messages, the real-time wire events, server configuration and the
//! error taxonomy shared by every other crate in the workspace.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod event;
