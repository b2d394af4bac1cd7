//! HTTP and WebSocket layer for murmur.
//!
//! Axum router serving chat history at `/messages`, the real-time channel at
//! `/ws`, a health probe, and optionally a built browser client.

pub mod error;
pub mod handlers;
pub mod router;
