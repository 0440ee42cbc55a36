//! Chat orchestration.
//!
//! `ChatService` sequences one chat turn end-to-end: read the recent window,
//! ask the agent, persist the exchange.

pub mod service;
