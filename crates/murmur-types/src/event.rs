//! Real-time channel events.
//!
//! Every WebSocket text frame is a JSON object `{ "event": <name>, "data": <payload> }`.
//! Inbound frames parse as [`ClientEvent`], outbound frames serialize from
//! [`ServerEvent`].

use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;

/// Event sent from a client session to the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// A candidate chat message. The payload is kept raw; the hub validates it.
    ChatMessage(serde_json::Value),
    /// Announced by browser clients when the user picks a name. No server-side effect.
    Join(serde_json::Value),
    /// Keep-alive. Answered with [`ServerEvent::Pong`] to the sender only.
    Ping,
}

/// Event sent from the server to client sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A persisted chat message, broadcast to every connected session.
    Message(ChatMessage),
    Pong,
}
