//! Shared domain types for Nifty.
//!
//! This crate contains the core domain types used across the service:
//! conversation turns, LLM request/response shapes, configuration, and
//! their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod turn;
