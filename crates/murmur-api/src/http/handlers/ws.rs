//! WebSocket transport for the real-time chat channel.
//!
//! The `/ws` endpoint upgrades an HTTP connection to a WebSocket. Once
//! connected, the handler:
//!
//! - **Registers the session** with the [`SessionHub`], handing it the sending
//!   half of an unbounded channel. Everything the hub delivers to that
//!   channel is forwarded to the client as a JSON text frame.
//! - **Receives events:** parses incoming text frames as [`ClientEvent`].
//!   `chatMessage` goes to the hub for persistence and broadcast, `ping` is
//!   answered with a `pong` to this session only. Anything else is logged and
//!   ignored.
//!
//! The session is removed from the hub when the socket closes or errors.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use murmur_core::history::HistoryStore;
use murmur_core::hub::{ChannelSink, ChatEventHandler, SessionHub, SessionId};
use murmur_types::event::{ClientEvent, ServerEvent};

use crate::state::{AppState, ConcreteHub};

/// Upgrade an HTTP request to a WebSocket chat session.
///
/// This is mounted at `/ws` in the router.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state.hub))
}

/// Core WebSocket connection handler.
///
/// Uses `tokio::select!` to multiplex between outbound events queued by the
/// hub and inbound frames from the client, keeping both halves in one task.
async fn handle_ws_connection(socket: WebSocket, hub: Arc<ConcreteHub>) {
    let session_id = SessionId::now_v7();
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ServerEvent>();

    hub.on_connect(session_id, outbound_tx);

    loop {
        tokio::select! {
            // --- Branch 1: Forward hub events to the client ---
            outbound = outbound_rx.recv() => {
                let Some(event) = outbound else {
                    // Hub dropped this session's sink.
                    break;
                };
                match serde_json::to_string(&event) {
                    Ok(json) => {
                        if ws_sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(%session_id, "Failed to serialize ServerEvent: {err}");
                    }
                }
            }

            // --- Branch 2: Process frames from the client ---
            msg_result = ws_receiver.next() => {
                match msg_result {
                    Some(Ok(Message::Text(text))) => {
                        process_frame(&hub, session_id, &text).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(%session_id, "WebSocket receive error: {err}");
                        break;
                    }
                    // Binary, ping and pong protocol frames are handled by axum/tungstenite
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    hub.on_disconnect(session_id);
    tracing::debug!(%session_id, "WebSocket connection closed");
}

/// Parse and dispatch a single text frame from `session_id`.
async fn process_frame<S: HistoryStore>(
    hub: &SessionHub<S, ChannelSink>,
    session_id: SessionId,
    text: &str,
) {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!(
                %session_id,
                raw = %text,
                error = %err,
                "Ignoring malformed WebSocket frame"
            );
            return;
        }
    };

    match event {
        ClientEvent::ChatMessage(payload) => {
            hub.on_chat_message(session_id, &payload).await;
        }
        ClientEvent::Join(data) => {
            tracing::debug!(%session_id, %data, "join has no server-side handler; ignoring");
        }
        ClientEvent::Ping => {
            hub.send_to(&session_id, &ServerEvent::Pong);
        }
    }
}
