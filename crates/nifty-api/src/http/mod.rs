//! HTTP/REST API layer for Nifty.
//!
//! Axum-based API with a chat endpoint, a session history endpoint and a
//! health probe. Errors render as `{"detail": ...}`.

pub mod error;
pub mod handlers;
pub mod router;
