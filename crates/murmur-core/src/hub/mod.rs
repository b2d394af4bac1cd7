//! Broadcast session hub.
//!
//! The hub owns the registry of connected sessions. Transports drive it
//! through the [`ChatEventHandler`] trait and receive outbound events through
//! a [`SessionSink`] they hand over on connect.

pub mod handler;
pub mod session_hub;
pub mod sink;

pub use handler::ChatEventHandler;
pub use session_hub::SessionHub;
pub use sink::{ChannelSink, SessionSink, SinkClosed};

/// Identifier of one live real-time connection.
pub type SessionId = uuid::Uuid;
