//! Business logic and port definitions for Nifty.
//!
//! This crate defines the "ports" (session store, LLM provider, agent) that
//! the infrastructure layer implements, plus the chat orchestrator that ties
//! them together. It depends only on `nifty-types` -- never on `nifty-infra`
//! or any database/IO crate.

pub mod agent;
pub mod chat;
pub mod llm;
pub mod session;
