//! Chat message types.
//!
//! A message travels through three shapes:
//!
//! - [`ChatPayload`]: the untrusted `{ username, message }` object a client sends.
//! - [`NewChatMessage`]: a validated candidate. The only constructor checks
//!   that both fields are non-empty.
//! - [`ChatMessage`]: the persisted record, with a server-assigned id and
//!   timestamp. Immutable once created.
//!
//! Numeric and boolean field values are accepted and stored as their text
//! form, so `{"username": 42}` becomes the sender `"42"`.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// A chat message as persisted by the history store and broadcast to sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    /// Display name of the sender.
    pub username: String,
    /// Message body.
    pub message: String,
    /// Server receipt time, microsecond precision.
    pub timestamp: DateTime<Utc>,
}

/// Raw inbound chat payload.
///
/// Both fields are optional at the wire level so that a missing field
/// surfaces as a [`ValidationError`] rather than a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatPayload {
    #[serde(default, deserialize_with = "scalar_text")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub message: Option<String>,
}

/// Accept a JSON string, number or boolean as text. `null` reads as absent.
fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(text)) => Ok(Some(text)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!("expected text, found {other}"))),
    }
}

impl ChatPayload {
    /// Interpret an arbitrary JSON value as a chat payload.
    ///
    /// Unknown fields are ignored. Scalar fields are converted to text;
    /// arrays and objects, or a non-object payload, are rejected as malformed.
    pub fn from_value(raw: &serde_json::Value) -> Result<Self, ValidationError> {
        Self::deserialize(raw).map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    /// Validate into a [`NewChatMessage`].
    pub fn validate(self) -> Result<NewChatMessage, ValidationError> {
        NewChatMessage::new(
            self.username.unwrap_or_default(),
            self.message.unwrap_or_default(),
        )
    }
}

/// A validated message that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChatMessage {
    username: String,
    message: String,
}

impl NewChatMessage {
    /// Build a candidate message.
    ///
    /// Only the empty string is rejected. Whitespace is significant and
    /// the text is kept as-is.
    pub fn new(
        username: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let username = username.into();
        let message = message.into();

        if username.is_empty() {
            return Err(ValidationError::MissingUsername);
        }
        if message.is_empty() {
            return Err(ValidationError::MissingMessage);
        }

        Ok(Self { username, message })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Assign an id (UUID v7) and the current time, producing the stored record.
    ///
    /// The timestamp is truncated to microseconds so that a record read back
    /// from storage compares equal to the one returned at append time.
    pub fn stamp(self) -> ChatMessage {
        self.stamp_at(Utc::now())
    }

    /// Like [`stamp`](Self::stamp) with an explicit receipt time.
    pub fn stamp_at(self, now: DateTime<Utc>) -> ChatMessage {
        let timestamp = DateTime::from_timestamp_micros(now.timestamp_micros()).unwrap_or(now);
        ChatMessage {
            id: Uuid::now_v7(),
            username: self.username,
            message: self.message,
            timestamp,
        }
    }
}
