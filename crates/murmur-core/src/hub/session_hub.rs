//! Session registry with persist-then-broadcast message handling.
//!
//! Each inbound chat message is validated and appended through the shared
//! [`HistoryService`]; only a successfully stored message is broadcast. The
//! broadcast goes to every registered session, the sender included. A sink
//! that reports closed is dropped from the registry; the other sessions are
//! unaffected.

use std::sync::Arc;

use dashmap::DashMap;
use murmur_types::chat::ChatPayload;
use murmur_types::error::ChatError;
use murmur_types::event::ServerEvent;
use tracing::{debug, error, info, warn};

use crate::history::service::HistoryService;
use crate::history::store::HistoryStore;
use crate::hub::SessionId;
use crate::hub::handler::ChatEventHandler;
use crate::hub::sink::SessionSink;

/// Registry of connected sessions, constructed once per server lifetime.
pub struct SessionHub<S: HistoryStore, K: SessionSink> {
    sessions: DashMap<SessionId, K>,
    history: Arc<HistoryService<S>>,
}

impl<S: HistoryStore, K: SessionSink> SessionHub<S, K> {
    pub fn new(history: Arc<HistoryService<S>>) -> Self {
        Self {
            sessions: DashMap::new(),
            history,
        }
    }

    /// The history service messages are persisted through.
    pub fn history(&self) -> &Arc<HistoryService<S>> {
        &self.history
    }

    /// Number of currently registered sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    #[cfg(test)]
    fn is_connected(&self, session_id: &SessionId) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Deliver `event` to one session. Returns false if the session is
    /// unknown or its sink is closed.
    pub fn send_to(&self, session_id: &SessionId, event: &ServerEvent) -> bool {
        match self.sessions.get(session_id) {
            Some(sink) => sink.deliver(event).is_ok(),
            None => false,
        }
    }

    /// Deliver `event` to every registered session.
    ///
    /// Returns the number of sessions that accepted it. Sessions whose sink
    /// is closed are removed.
    pub fn broadcast(&self, event: &ServerEvent) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();

        for entry in self.sessions.iter() {
            match entry.value().deliver(event) {
                Ok(()) => delivered += 1,
                Err(_) => closed.push(*entry.key()),
            }
        }

        for session_id in closed {
            self.sessions.remove(&session_id);
            debug!(%session_id, "pruned session with closed sink");
        }

        delivered
    }
}

impl<S: HistoryStore, K: SessionSink> ChatEventHandler for SessionHub<S, K> {
    type Sink = K;

    fn on_connect(&self, session_id: SessionId, sink: K) {
        self.sessions.insert(session_id, sink);
        info!(%session_id, sessions = self.sessions.len(), "user connected");
    }

    fn on_disconnect(&self, session_id: SessionId) {
        if self.sessions.remove(&session_id).is_some() {
            info!(%session_id, sessions = self.sessions.len(), "user disconnected");
        }
    }

    async fn on_chat_message(
        &self,
        session_id: SessionId,
        raw_payload: &serde_json::Value,
    ) -> Option<usize> {
        let result = match ChatPayload::from_value(raw_payload) {
            Ok(payload) => self.history.append(payload).await,
            Err(err) => Err(ChatError::Validation(err)),
        };

        match result {
            Ok(stored) => Some(self.broadcast(&ServerEvent::Message(stored))),
            Err(ChatError::Validation(err)) => {
                warn!(%session_id, error = %err, "dropping invalid chat message");
                None
            }
            Err(err @ ChatError::StoreUnavailable(_)) => {
                error!(%session_id, error = %err, "error saving chat message");
                None
            }
        }
    }
}

impl<S: HistoryStore, K: SessionSink> std::fmt::Debug for SessionHub<S, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHub")
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::memory::InMemoryHistoryStore;
    use crate::hub::sink::ChannelSink;
    use serde_json::json;
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use uuid::Uuid;

    type TestHub = SessionHub<InMemoryHistoryStore, ChannelSink>;

    fn hub() -> TestHub {
        let history = HistoryService::new(InMemoryHistoryStore::new(), 50);
        SessionHub::new(Arc::new(history))
    }

    fn connect(hub: &TestHub) -> (SessionId, UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::now_v7();
        hub.on_connect(id, tx);
        (id, rx)
    }

    fn expect_message(rx: &mut UnboundedReceiver<ServerEvent>, username: &str, message: &str) {
        match rx.try_recv() {
            Ok(ServerEvent::Message(stored)) => {
                assert_eq!(stored.username, username);
                assert_eq!(stored.message, message);
            }
            other => panic!("expected message event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn chat_message_reaches_every_session_including_sender() {
        let hub = hub();
        let (a, mut rx_a) = connect(&hub);
        let (_b, mut rx_b) = connect(&hub);

        let delivered = hub
            .on_chat_message(a, &json!({ "username": "alice", "message": "hello" }))
            .await;

        assert_eq!(delivered, Some(2));
        expect_message(&mut rx_a, "alice", "hello");
        expect_message(&mut rx_b, "alice", "hello");
        assert!(rx_a.try_recv().is_err(), "exactly one event per session");
        assert!(rx_b.try_recv().is_err(), "exactly one event per session");
        assert_eq!(hub.history().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn broadcast_carries_the_stored_record() {
        let hub = hub();
        let (a, mut rx_a) = connect(&hub);

        hub.on_chat_message(a, &json!({ "username": "alice", "message": "hi" }))
            .await
            .unwrap();

        let history = hub.history().history().await.unwrap();
        match rx_a.try_recv().unwrap() {
            ServerEvent::Message(stored) => assert_eq!(stored, history[0]),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_username_is_dropped_without_broadcast() {
        let hub = hub();
        let (a, mut rx_a) = connect(&hub);
        let (_b, mut rx_b) = connect(&hub);

        let delivered = hub
            .on_chat_message(a, &json!({ "username": "", "message": "x" }))
            .await;

        assert_eq!(delivered, None);
        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_err());
        assert_eq!(hub.history().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_or_malformed_fields_are_dropped() {
        let hub = hub();
        let (a, mut rx_a) = connect(&hub);

        for raw in [
            json!({ "username": "alice" }),
            json!({ "message": "orphan" }),
            json!({ "username": ["alice"], "message": "x" }),
            json!(null),
        ] {
            assert_eq!(hub.on_chat_message(a, &raw).await, None, "payload {raw}");
        }

        assert!(rx_a.try_recv().is_err());
        assert_eq!(hub.history().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn scalar_and_whitespace_payloads_are_stored_as_text() {
        let hub = hub();
        let (a, mut rx_a) = connect(&hub);

        let delivered = hub
            .on_chat_message(a, &json!({ "username": 42, "message": " " }))
            .await;

        assert_eq!(delivered, Some(1));
        expect_message(&mut rx_a, "42", " ");
        assert_eq!(hub.history().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn store_failure_is_swallowed_without_broadcast() {
        let hub = hub();
        let (a, mut rx_a) = connect(&hub);
        hub.history().store().set_available(false);

        let delivered = hub
            .on_chat_message(a, &json!({ "username": "alice", "message": "hi" }))
            .await;

        assert_eq!(delivered, None);
        assert!(rx_a.try_recv().is_err());

        // Unrelated later messages are unaffected.
        hub.history().store().set_available(true);
        let delivered = hub
            .on_chat_message(a, &json!({ "username": "alice", "message": "again" }))
            .await;
        assert_eq!(delivered, Some(1));
        expect_message(&mut rx_a, "alice", "again");
    }

    #[tokio::test]
    async fn disconnected_session_stops_receiving() {
        let hub = hub();
        let (a, mut rx_a) = connect(&hub);
        let (b, mut rx_b) = connect(&hub);

        hub.on_disconnect(b);
        assert!(!hub.is_connected(&b));
        assert_eq!(hub.session_count(), 1);

        let delivered = hub
            .on_chat_message(a, &json!({ "username": "alice", "message": "still here?" }))
            .await;

        assert_eq!(delivered, Some(1));
        expect_message(&mut rx_a, "alice", "still here?");
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn closed_sink_is_pruned_and_others_still_receive() {
        let hub = hub();
        let (a, mut rx_a) = connect(&hub);
        let (b, rx_b) = connect(&hub);
        drop(rx_b);

        let delivered = hub
            .on_chat_message(a, &json!({ "username": "alice", "message": "hi" }))
            .await;

        assert_eq!(delivered, Some(1));
        expect_message(&mut rx_a, "alice", "hi");
        assert!(!hub.is_connected(&b));
    }

    #[tokio::test]
    async fn sender_need_not_be_registered() {
        let hub = hub();
        let (_a, mut rx_a) = connect(&hub);

        let delivered = hub
            .on_chat_message(Uuid::now_v7(), &json!({ "username": "ghost", "message": "boo" }))
            .await;

        assert_eq!(delivered, Some(1));
        expect_message(&mut rx_a, "ghost", "boo");
    }

    #[test]
    fn send_to_targets_a_single_session() {
        let hub = hub();
        let (a, mut rx_a) = connect(&hub);
        let (_b, mut rx_b) = connect(&hub);

        assert!(hub.send_to(&a, &ServerEvent::Pong));
        assert_eq!(rx_a.try_recv().unwrap(), ServerEvent::Pong);
        assert!(rx_b.try_recv().is_err());
        assert!(!hub.send_to(&Uuid::now_v7(), &ServerEvent::Pong));
    }

    #[test]
    fn debug_impl_reports_session_count() {
        let hub = hub();
        let (_a, _rx) = connect(&hub);
        let debug = format!("{hub:?}");
        assert!(debug.contains("SessionHub"));
        assert!(debug.contains("sessions: 1"));
    }
}
