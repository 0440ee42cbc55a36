//! Observability setup for Nifty: structured logging with optional
//! OpenTelemetry span export.

pub mod tracing_setup;
