//! LLM provider implementations.
//!
//! Contains the OpenAI-compatible implementation of the [`LlmProvider`]
//! trait defined in `nifty-core`, plus [`create_provider`] which builds it
//! from the agent configuration and an API key.
//!
//! [`LlmProvider`]: nifty_core::llm::provider::LlmProvider

pub mod openai_compat;

use nifty_core::llm::box_provider::BoxLlmProvider;
use nifty_types::config::AgentConfig;
use secrecy::SecretString;

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::OpenAiCompatConfig;

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Read the API key from `OPENAI_API_KEY`, ignoring blank values.
pub fn api_key_from_env() -> Option<SecretString> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .map(SecretString::from)
}

/// Create a [`BoxLlmProvider`] for the configured agent.
pub fn create_provider(agent: &AgentConfig, api_key: SecretString) -> BoxLlmProvider {
    let config = OpenAiCompatConfig::from_agent(agent, api_key);
    tracing::debug!(
        provider = %config.provider_name,
        base_url = %config.base_url,
        model = %config.model,
        "Creating LLM provider"
    );
    BoxLlmProvider::new(OpenAiCompatibleProvider::new(config))
}
