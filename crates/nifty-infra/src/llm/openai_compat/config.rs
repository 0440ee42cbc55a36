//! Configuration for the OpenAI-compatible provider.

use nifty_types::config::AgentConfig;
use secrecy::SecretString;

/// Base URL of the official OpenAI API.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name ("openai" or "openai_compatible").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    /// API key for authentication.
    pub api_key: SecretString,
    /// Default model identifier (e.g., "gpt-4o-mini").
    pub model: String,
}

impl OpenAiCompatConfig {
    /// Build the provider configuration for an agent persona.
    pub fn from_agent(agent: &AgentConfig, api_key: SecretString) -> Self {
        let base_url = agent.base_url.trim_end_matches('/').to_string();
        let provider_name = if base_url == OPENAI_BASE_URL {
            "openai"
        } else {
            "openai_compatible"
        };

        Self {
            provider_name: provider_name.into(),
            base_url,
            api_key,
            model: agent.model.clone(),
        }
    }
}
