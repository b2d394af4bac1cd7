//! Application error type mapping to HTTP status codes.
//!
//! Error bodies are `{ "error": <text> }`. Store failures use a fixed,
//! generic message; the underlying cause is logged by the handler, never
//! sent to the client.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use murmur_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat history errors.
    History(ChatError),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::History(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // No route accepts a chat payload over HTTP; kept so the match stays total.
            AppError::History(ChatError::Validation(e)) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::History(ChatError::StoreUnavailable(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch messages".to_string(),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_types::error::{StoreError, ValidationError};

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn store_failure_is_500_with_generic_message() {
        let err = AppError::from(ChatError::StoreUnavailable(StoreError::Unavailable(
            "disk on fire".to_string(),
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Failed to fetch messages");
        assert!(!body.to_string().contains("disk on fire"));
    }

    #[tokio::test]
    async fn validation_failure_is_400() {
        let err = AppError::from(ChatError::Validation(ValidationError::MissingUsername));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "username is required");
    }
}
