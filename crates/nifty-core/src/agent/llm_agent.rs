//! Agent backed by a hosted language model.

use nifty_types::config::AgentConfig;
use nifty_types::llm::{CompletionRequest, LlmError, Message};
use tracing::debug;

use super::Agent;
use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::provider::LlmProvider;

/// An [`Agent`] that forwards the conversation to a [`BoxLlmProvider`].
///
/// The persona (instructions, model, sampling settings) is fixed at
/// construction and sent as the system prompt on every call.
pub struct LlmAgent {
    provider: BoxLlmProvider,
    config: AgentConfig,
}

impl LlmAgent {
    pub fn new(provider: BoxLlmProvider, config: AgentConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn build_request(&self, messages: &[Message]) -> CompletionRequest {
        CompletionRequest {
            model: self.config.model.clone(),
            messages: messages.to_vec(),
            system: Some(self.config.instructions.clone()),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }
}

impl Agent for LlmAgent {
    async fn reply(&self, messages: &[Message]) -> Result<String, LlmError> {
        let request = self.build_request(messages);
        let response = self.provider.complete(&request).await?;

        debug!(
            agent = %self.config.name,
            provider = self.provider.name(),
            model = %response.model,
            stop_reason = %response.stop_reason,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Agent reply received"
        );

        let text = response.content.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyReply);
        }
        Ok(text.to_string())
    }
}
