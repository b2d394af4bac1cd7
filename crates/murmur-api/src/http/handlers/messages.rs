//! Chat history HTTP handler.
//!
//! Endpoints:
//! - GET /messages - Most recent messages, oldest first

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use murmur_types::chat::ChatMessage;

use crate::http::error::AppError;
use crate::state::AppState;

/// Query parameters for history retrieval.
#[derive(Debug, Default, Deserialize)]
pub struct MessageListQuery {
    /// Fewer messages than the configured maximum. Larger values are clamped.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// GET /messages - Up to `history_limit` most recent messages in chronological order.
pub async fn get_messages(
    State(state): State<AppState>,
    Query(query): Query<MessageListQuery>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let max = state.history.history_limit();
    let limit = query.limit.map_or(max, |limit| limit.min(max));

    let messages = state
        .history
        .recent_messages(limit)
        .await
        .inspect_err(|err| tracing::error!(error = %err, "Error fetching messages"))?;

    Ok(Json(messages))
}
