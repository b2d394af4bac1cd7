//! Observability setup for murmur: structured logging via `tracing`, with an
//! optional OpenTelemetry span exporter.

pub mod tracing_setup;

pub use tracing_setup::{LogFormat, init_tracing, shutdown_tracing};
