//! Chat service orchestrating one conversational turn.
//!
//! ChatService coordinates a [`SessionStore`] and an [`Agent`]:
//!
//! 1. resolve (or generate) the session id
//! 2. reject blank messages before touching storage
//! 3. read the recent window and append the new user message in memory
//! 4. ask the agent for a reply
//! 5. persist the user turn, then the assistant turn
//!
//! When the agent fails the behaviour follows [`AgentFailurePolicy`]: either
//! a fixed apology is returned and stored as the assistant turn, or the error
//! is returned and nothing is stored.

use nifty_types::config::{AgentFailurePolicy, DEFAULT_FALLBACK_REPLY, GlobalConfig};
use nifty_types::error::ChatError;
use nifty_types::llm::Message;
use nifty_types::turn::{DEFAULT_HISTORY_LIMIT, Turn};
use tracing::{info, warn};

use crate::agent::Agent;
use crate::session::id::resolve_session_id;
use crate::session::store::SessionStore;

/// Result of a handled chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub reply: String,
    pub session_id: String,
}

/// Orchestrates a chat turn between the session store and the agent.
///
/// Generic over `SessionStore` and `Agent` so tests can inject doubles and
/// nifty-core never depends on nifty-infra.
pub struct ChatService<S: SessionStore, A: Agent> {
    store: S,
    agent: A,
    history_limit: usize,
    failure_policy: AgentFailurePolicy,
    fallback_reply: String,
}

impl<S: SessionStore, A: Agent> ChatService<S, A> {
    /// Create a chat service with the default window and apologize policy.
    pub fn new(store: S, agent: A) -> Self {
        Self {
            store,
            agent,
            history_limit: DEFAULT_HISTORY_LIMIT,
            failure_policy: AgentFailurePolicy::default(),
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_string(),
        }
    }

    /// Apply the window size and failure handling from the global config.
    pub fn with_config(mut self, config: &GlobalConfig) -> Self {
        self.history_limit = config.history_limit;
        self.failure_policy = config.on_agent_failure;
        self.fallback_reply = config.fallback_reply.clone();
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_failure_policy(mut self, policy: AgentFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Access the session store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Handle one user message and return the reply with its session id.
    pub async fn handle_message(
        &self,
        session_id: Option<&str>,
        user_text: &str,
    ) -> Result<ChatReply, ChatError> {
        let session_id = resolve_session_id(session_id);

        let user_text = user_text.trim();
        if user_text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let history = self
            .store
            .get_recent(&session_id, self.history_limit)
            .await?;

        let mut context: Vec<Message> = history.iter().map(Turn::to_message).collect();
        context.push(Message::user(user_text));

        let reply = match self.agent.reply(&context).await {
            Ok(reply) => reply,
            Err(err) => match self.failure_policy {
                AgentFailurePolicy::Apologize => {
                    warn!(
                        session_id = %session_id,
                        error = %err,
                        "Agent call failed, substituting fallback reply"
                    );
                    self.fallback_reply.clone()
                }
                AgentFailurePolicy::Propagate => {
                    warn!(session_id = %session_id, error = %err, "Agent call failed");
                    return Err(err.into());
                }
            },
        };

        self.store.append(&session_id, Turn::user(user_text)).await?;
        self.store
            .append(&session_id, Turn::assistant(reply.clone()))
            .await?;

        info!(
            session_id = %session_id,
            window = history.len(),
            "Chat message handled"
        );

        Ok(ChatReply { reply, session_id })
    }

    /// Read the last `limit` turns of a session, oldest first.
    pub async fn history(&self, session_id: &str, limit: usize) -> Result<Vec<Turn>, ChatError> {
        Ok(self.store.get_recent(session_id, limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use nifty_types::error::RepositoryError;
    use nifty_types::llm::{LlmError, MessageRole};
    use nifty_types::turn::{TurnRole, recent_window};

    use super::*;

    /// In-memory store that counts writes.
    #[derive(Default)]
    struct MemoryStore {
        sessions: Mutex<HashMap<String, Vec<Turn>>>,
        writes: AtomicUsize,
    }

    impl MemoryStore {
        fn all(&self, session_id: &str) -> Vec<Turn> {
            self.sessions
                .lock()
                .unwrap()
                .get(session_id)
                .cloned()
                .unwrap_or_default()
        }
    }

    impl SessionStore for MemoryStore {
        async fn get_recent(
            &self,
            session_id: &str,
            limit: usize,
        ) -> Result<Vec<Turn>, RepositoryError> {
            Ok(recent_window(&self.all(session_id), limit).to_vec())
        }

        async fn append(&self, session_id: &str, turn: Turn) -> Result<(), RepositoryError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.sessions
                .lock()
                .unwrap()
                .entry(session_id.to_string())
                .or_default()
                .push(turn);
            Ok(())
        }
    }

    /// Agent that numbers its replies and records every context it was given.
    #[derive(Default)]
    struct CountingAgent {
        calls: AtomicUsize,
        contexts: Mutex<Vec<Vec<Message>>>,
    }

    impl Agent for CountingAgent {
        async fn reply(&self, messages: &[Message]) -> Result<String, LlmError> {
            self.contexts.lock().unwrap().push(messages.to_vec());
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("reply-{n}"))
        }
    }

    struct FailingAgent;

    impl Agent for FailingAgent {
        async fn reply(&self, _messages: &[Message]) -> Result<String, LlmError> {
            Err(LlmError::Overloaded("busy".to_string()))
        }
    }

    fn service() -> ChatService<MemoryStore, CountingAgent> {
        ChatService::new(MemoryStore::default(), CountingAgent::default())
    }

    #[tokio::test]
    async fn test_new_session_id_is_generated_and_reusable() {
        let svc = service();
        let first = svc.handle_message(None, "hi").await.unwrap();
        assert!(!first.session_id.is_empty());
        assert_eq!(URL_SAFE_NO_PAD.decode(&first.session_id).unwrap().len(), 32);

        let second = svc
            .handle_message(Some(&first.session_id), "again")
            .await
            .unwrap();
        assert_eq!(second.session_id, first.session_id);
        assert_eq!(svc.store().all(&first.session_id).len(), 4);
    }

    #[tokio::test]
    async fn test_empty_session_id_gets_generated() {
        let svc = service();
        let reply = svc.handle_message(Some(""), "hi").await.unwrap();
        assert_eq!(reply.session_id.len(), 43);
    }

    #[tokio::test]
    async fn test_two_messages_store_four_turns_in_order() {
        let svc = service();
        svc.handle_message(Some("sid"), "a").await.unwrap();
        svc.handle_message(Some("sid"), "b").await.unwrap();

        let turns = svc.history("sid", 10).await.unwrap();
        assert_eq!(
            turns,
            vec![
                Turn::user("a"),
                Turn::assistant("reply-1"),
                Turn::user("b"),
                Turn::assistant("reply-2"),
            ]
        );
    }

    #[tokio::test]
    async fn test_blank_messages_are_rejected_without_writes() {
        let svc = service();
        for text in ["", "   ", "\n\t"] {
            let err = svc.handle_message(Some("sid"), text).await.unwrap_err();
            assert!(matches!(err, ChatError::EmptyMessage));
        }
        assert_eq!(svc.store().writes.load(Ordering::SeqCst), 0);
        assert_eq!(svc.agent.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_message_is_trimmed_before_use() {
        let svc = service();
        svc.handle_message(Some("sid"), "  hello  ").await.unwrap();
        assert_eq!(svc.store().all("sid")[0], Turn::user("hello"));
    }

    #[tokio::test]
    async fn test_agent_sees_history_then_new_message() {
        let svc = service();
        svc.handle_message(Some("sid"), "a").await.unwrap();
        svc.handle_message(Some("sid"), "b").await.unwrap();

        let contexts = svc.agent.contexts.lock().unwrap();
        assert_eq!(contexts[0], vec![Message::user("a")]);

        let second = &contexts[1];
        let roles: Vec<&MessageRole> = second.iter().map(|m| &m.role).collect();
        let texts: Vec<&str> = second.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(
            roles,
            vec![&MessageRole::User, &MessageRole::Assistant, &MessageRole::User]
        );
        assert_eq!(texts, vec!["a", "reply-1", "b"]);
    }

    #[tokio::test]
    async fn test_context_window_is_bounded() {
        let svc = service().with_history_limit(2);
        for text in ["one", "two", "three"] {
            svc.handle_message(Some("sid"), text).await.unwrap();
        }

        let contexts = svc.agent.contexts.lock().unwrap();
        let last = contexts.last().unwrap();
        let texts: Vec<&str> = last.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(texts, vec!["two", "reply-2", "three"]);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let svc = service();
        svc.handle_message(Some("alice"), "hello").await.unwrap();
        svc.handle_message(Some("bob"), "howdy").await.unwrap();

        let alice = svc.history("alice", 20).await.unwrap();
        assert_eq!(alice.len(), 2);
        assert_eq!(alice[0].text, "hello");
        assert!(svc.history("carol", 20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_apologize_policy_persists_fallback_reply() {
        let svc = ChatService::new(MemoryStore::default(), FailingAgent);
        let result = svc.handle_message(Some("sid"), "are you there?").await.unwrap();
        assert_eq!(result.reply, DEFAULT_FALLBACK_REPLY);

        let turns = svc.store().all("sid");
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], Turn::user("are you there?"));
        assert_eq!(turns[1].role, TurnRole::Assistant);
        assert_eq!(turns[1].text, DEFAULT_FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_propagate_policy_persists_nothing() {
        let svc = ChatService::new(MemoryStore::default(), FailingAgent)
            .with_failure_policy(AgentFailurePolicy::Propagate);
        let err = svc.handle_message(Some("sid"), "hello?").await.unwrap_err();
        assert!(matches!(err, ChatError::Agent(LlmError::Overloaded(_))));
        assert_eq!(svc.store().writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_with_config_applies_settings() {
        let config = GlobalConfig {
            history_limit: 4,
            on_agent_failure: AgentFailurePolicy::Apologize,
            fallback_reply: "late again".to_string(),
            ..GlobalConfig::default()
        };
        let svc = ChatService::new(MemoryStore::default(), FailingAgent).with_config(&config);
        assert_eq!(svc.history_limit(), 4);
        let result = svc.handle_message(Some("sid"), "hi").await.unwrap();
        assert_eq!(result.reply, "late again");
    }
}
