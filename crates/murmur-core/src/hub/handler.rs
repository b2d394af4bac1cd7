//! Transport-facing event handler trait.

use crate::hub::SessionId;
use crate::hub::sink::SessionSink;

/// Lifecycle and message events raised by a real-time transport.
///
/// Connection and disconnection are transport events, not application
/// messages; the transport calls `on_connect` once when a session opens and
/// `on_disconnect` once when it closes.
pub trait ChatEventHandler: Send + Sync {
    /// Handle type used to push outbound events to one session.
    type Sink: SessionSink;

    /// Register a session. It receives every broadcast from now on.
    fn on_connect(&self, session_id: SessionId, sink: Self::Sink);

    /// Remove a session. No further broadcasts are delivered to it.
    fn on_disconnect(&self, session_id: SessionId);

    /// Handle an inbound `chatMessage` payload from `session_id`.
    ///
    /// Returns the number of sessions the stored message was delivered to,
    /// or `None` when the payload was rejected or could not be stored.
    /// Failures are never reported back to the sender.
    fn on_chat_message(
        &self,
        session_id: SessionId,
        raw_payload: &serde_json::Value,
    ) -> impl std::future::Future<Output = Option<usize>> + Send;
}
