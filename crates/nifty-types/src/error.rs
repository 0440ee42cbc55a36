use thiserror::Error;

use crate::llm::LlmError;

/// Errors from session storage operations (used by trait definitions in nifty-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(String),
}

/// Errors surfaced by the chat orchestrator.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message must not be empty")]
    EmptyMessage,

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),

    #[error("agent error: {0}")]
    Agent(#[from] LlmError),
}
