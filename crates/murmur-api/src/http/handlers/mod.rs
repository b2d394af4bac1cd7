//! HTTP request handlers.

pub mod messages;
pub mod ws;
