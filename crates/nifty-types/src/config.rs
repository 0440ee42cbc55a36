//! Global configuration types for Nifty.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! agent persona, the storage backend, the history window, and how agent
//! failures are surfaced.

use serde::{Deserialize, Serialize};

use crate::turn::DEFAULT_HISTORY_LIMIT;

/// Instructions handed to the agent when `config.toml` does not override them.
pub const DEFAULT_INSTRUCTIONS: &str = "You are nifty-bot, a friendly AI agent inspired by the White Rabbit from \
     Alice in Wonderland. You adore rabbit-themed NFTs on Ethereum L1 and L2. \
     You often worry about the time. Be short, conversational, and rabbit-themed.";

/// Reply persisted and returned when the agent fails under [`AgentFailurePolicy::Apologize`].
pub const DEFAULT_FALLBACK_REPLY: &str =
    "Oh my ears and whiskers, I'm running late! I couldn't answer just now, please try again.";

/// Top-level configuration for the service.
///
/// Loaded from `~/.nifty/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Number of most recent turns sent to the agent as context.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// What to do when the agent call fails.
    #[serde(default)]
    pub on_agent_failure: AgentFailurePolicy,

    /// Reply substituted for a failed agent call under the apologize policy.
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_fallback_reply() -> String {
    DEFAULT_FALLBACK_REPLY.to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            on_agent_failure: AgentFailurePolicy::default(),
            fallback_reply: default_fallback_reply(),
            agent: AgentConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

/// How the orchestrator reacts when the agent collaborator fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentFailurePolicy {
    /// Substitute the fallback reply and persist it as the assistant turn.
    #[default]
    Apologize,
    /// Fail the request; nothing is persisted.
    Propagate,
}

/// Static agent persona and model settings, fixed once per process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,
    #[serde(default = "default_instructions")]
    pub instructions: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Base URL of the OpenAI-compatible endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_agent_name() -> String {
    "Nifty-Bot".to_string()
}

fn default_instructions() -> String {
    DEFAULT_INSTRUCTIONS.to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            instructions: default_instructions(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: None,
            base_url: default_base_url(),
        }
    }
}

/// Which session store implementation backs the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Embedded SQLite file, one row per session.
    #[default]
    Sqlite,
    /// One JSON document per session on the local filesystem.
    Documents,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.on_agent_failure, AgentFailurePolicy::Apologize);
        assert_eq!(config.agent.name, "Nifty-Bot");
        assert_eq!(config.agent.model, "gpt-4o-mini");
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
    }

    #[test]
    fn test_global_config_deserialize_with_defaults() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.fallback_reply, DEFAULT_FALLBACK_REPLY);
        assert_eq!(config.agent.instructions, DEFAULT_INSTRUCTIONS);
    }

    #[test]
    fn test_global_config_deserialize_with_values() {
        let toml_str = r#"
history_limit = 8
on_agent_failure = "propagate"

[agent]
model = "gpt-4o"
temperature = 0.2

[storage]
backend = "documents"
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.history_limit, 8);
        assert_eq!(config.on_agent_failure, AgentFailurePolicy::Propagate);
        assert_eq!(config.agent.model, "gpt-4o");
        assert_eq!(config.agent.temperature, Some(0.2));
        assert_eq!(config.agent.name, "Nifty-Bot");
        assert_eq!(config.storage.backend, StorageBackend::Documents);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let result: Result<GlobalConfig, _> = toml::from_str(r#"on_agent_failure = "retry""#);
        assert!(result.is_err());
    }
}
