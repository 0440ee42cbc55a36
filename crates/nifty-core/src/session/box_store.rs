//! BoxSessionStore: lets the storage backend be picked from config at runtime.
//!
//! `SessionStoreDyn` boxes the futures of [`SessionStore`] and is implemented
//! for every store; `BoxSessionStore` holds one and implements `SessionStore`
//! again by delegation.

use std::future::Future;
use std::pin::Pin;

use nifty_types::error::RepositoryError;
use nifty_types::turn::Turn;

use super::store::SessionStore;

/// Object-safe version of [`SessionStore`] with boxed futures.
pub trait SessionStoreDyn: Send + Sync {
    fn get_recent_boxed<'a>(
        &'a self,
        session_id: &'a str,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Turn>, RepositoryError>> + Send + 'a>>;

    fn append_boxed<'a>(
        &'a self,
        session_id: &'a str,
        turn: Turn,
    ) -> Pin<Box<dyn Future<Output = Result<(), RepositoryError>> + Send + 'a>>;
}

impl<T: SessionStore> SessionStoreDyn for T {
    fn get_recent_boxed<'a>(
        &'a self,
        session_id: &'a str,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Turn>, RepositoryError>> + Send + 'a>> {
        Box::pin(self.get_recent(session_id, limit))
    }

    fn append_boxed<'a>(
        &'a self,
        session_id: &'a str,
        turn: Turn,
    ) -> Pin<Box<dyn Future<Output = Result<(), RepositoryError>> + Send + 'a>> {
        Box::pin(self.append(session_id, turn))
    }
}

/// Type-erased session store for runtime backend selection.
///
/// The storage backend (SQLite or JSON documents) is picked from
/// `config.toml` at startup, so the orchestrator is pinned to this wrapper
/// rather than to a concrete store.
pub struct BoxSessionStore {
    inner: Box<dyn SessionStoreDyn + Send + Sync>,
}

impl BoxSessionStore {
    /// Wrap a concrete `SessionStore` in a type-erased box.
    pub fn new<T: SessionStore + 'static>(store: T) -> Self {
        Self {
            inner: Box::new(store),
        }
    }
}

impl SessionStore for BoxSessionStore {
    async fn get_recent(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<Turn>, RepositoryError> {
        self.inner.get_recent_boxed(session_id, limit).await
    }

    async fn append(&self, session_id: &str, turn: Turn) -> Result<(), RepositoryError> {
        self.inner.append_boxed(session_id, turn).await
    }
}
