use thiserror::Error;

/// A chat payload that cannot become a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("username is required")]
    MissingUsername,

    #[error("message is required")]
    MissingMessage,

    #[error("malformed chat payload: {0}")]
    Malformed(String),
}

/// Errors from history store operations (used by trait definitions in murmur-core).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("query error: {0}")]
    Query(String),
}

/// Errors surfaced by the chat history service.
///
/// Every store failure, connectivity or query, is reported as
/// `StoreUnavailable` to callers.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid chat message: {0}")]
    Validation(#[from] ValidationError),

    #[error("history store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}
