//! Outbound delivery seam between the hub and a transport.

use murmur_types::event::ServerEvent;
use thiserror::Error;
use tokio::sync::mpsc;

/// The session on the other end of a sink has gone away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("session sink closed")]
pub struct SinkClosed;

/// Per-session handle the hub delivers outbound events through.
///
/// Delivery must not block: the hub calls `deliver` for every session while
/// iterating its registry.
pub trait SessionSink: Send + Sync {
    fn deliver(&self, event: &ServerEvent) -> Result<(), SinkClosed>;
}

/// Channel sink drained by a transport task (e.g. a WebSocket writer).
pub type ChannelSink = mpsc::UnboundedSender<ServerEvent>;

impl SessionSink for mpsc::UnboundedSender<ServerEvent> {
    fn deliver(&self, event: &ServerEvent) -> Result<(), SinkClosed> {
        self.send(event.clone()).map_err(|_| SinkClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_sink_delivers_until_receiver_dropped() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        assert!(tx.deliver(&ServerEvent::Pong).is_ok());
        assert_eq!(rx.try_recv().unwrap(), ServerEvent::Pong);

        drop(rx);
        assert_eq!(tx.deliver(&ServerEvent::Pong), Err(SinkClosed));
    }
}
