//! Application state wiring the session store and agent together.
//!
//! AppState holds the concrete chat service used by both the CLI and the
//! REST API. `ChatService` is generic over store and agent; AppState pins it
//! to a boxed store (SQLite or JSON documents, chosen by config) and the
//! LLM-backed agent.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use nifty_core::agent::llm_agent::LlmAgent;
use nifty_core::chat::service::ChatService;
use nifty_core::llm::box_provider::BoxLlmProvider;
use nifty_core::session::box_store::BoxSessionStore;
use nifty_infra::config::{database_url, documents_dir, load_global_config};
use nifty_infra::document::DocumentSessionStore;
use nifty_infra::llm::{API_KEY_ENV, api_key_from_env, create_provider};
use nifty_infra::sqlite::pool::DatabasePool;
use nifty_infra::sqlite::session::SqliteSessionStore;
use nifty_types::config::{GlobalConfig, StorageBackend};

/// Chat service pinned to the infra implementations.
pub type ConcreteChatService = ChatService<BoxSessionStore, LlmAgent>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load config, open the store, build the agent.
    ///
    /// Fails when `OPENAI_API_KEY` is not set.
    pub async fn init(data_dir: PathBuf) -> anyhow::Result<Self> {
        let api_key = api_key_from_env()
            .with_context(|| format!("{API_KEY_ENV} is not set; export it to talk to the agent"))?;

        let config = load_global_config(&data_dir).await;
        let store = open_store(&data_dir, &config).await?;
        let provider = create_provider(&config.agent, api_key);

        tracing::info!(
            data_dir = %data_dir.display(),
            backend = ?config.storage.backend,
            model = %config.agent.model,
            "Application state initialized"
        );

        Ok(Self::from_parts(store, provider, config, data_dir))
    }

    /// Wire a state from already-built parts.
    pub fn from_parts(
        store: BoxSessionStore,
        provider: BoxLlmProvider,
        config: GlobalConfig,
        data_dir: PathBuf,
    ) -> Self {
        let agent = LlmAgent::new(provider, config.agent.clone());
        let chat_service = ChatService::new(store, agent).with_config(&config);

        Self {
            chat_service: Arc::new(chat_service),
            config: Arc::new(config),
            data_dir,
        }
    }
}

/// Open the session store selected by `[storage] backend`.
pub async fn open_store(data_dir: &Path, config: &GlobalConfig) -> anyhow::Result<BoxSessionStore> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let store = match config.storage.backend {
        StorageBackend::Sqlite => {
            let pool = DatabasePool::new(&database_url(data_dir))
                .await
                .context("failed to open session database")?;
            BoxSessionStore::new(SqliteSessionStore::new(pool))
        }
        StorageBackend::Documents => {
            let store = DocumentSessionStore::open(documents_dir(data_dir))
                .await
                .context("failed to open session documents")?;
            BoxSessionStore::new(store)
        }
    };

    Ok(store)
}
