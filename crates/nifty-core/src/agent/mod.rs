//! The agent collaborator boundary.
//!
//! The orchestrator only ever sees [`Agent`]: hand it the ordered context,
//! get back one reply string or an error. Everything about talking to a
//! concrete model (system prompt, model name, response shape) lives behind
//! this trait in [`llm_agent::LlmAgent`].

pub mod llm_agent;

use nifty_types::llm::{LlmError, Message};

/// A conversational agent that answers an ordered list of messages.
pub trait Agent: Send + Sync {
    /// Produce the final reply text for `messages`.
    ///
    /// The last entry of `messages` is the user message being answered.
    fn reply(
        &self,
        messages: &[Message],
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;
}
