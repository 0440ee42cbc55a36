//! SessionStore trait definition.
//!
//! A session store is an append-only log of turns keyed by session id, with a
//! bounded "last N" read. Follows the same RPITIT pattern as `LlmProvider`.

use nifty_types::error::RepositoryError;
use nifty_types::turn::Turn;

/// Durable mapping from a session id to its ordered sequence of turns.
///
/// Implementations live in nifty-infra (`SqliteSessionStore`,
/// `DocumentSessionStore`). Uses native async fn in traits (RPITIT, Rust 2024
/// edition).
pub trait SessionStore: Send + Sync {
    /// Return the last `limit` turns of the session in append order.
    ///
    /// An unknown session yields an empty vector, never an error.
    fn get_recent(
        &self,
        session_id: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Turn>, RepositoryError>> + Send;

    /// Append one turn to the end of the session, creating it if needed.
    ///
    /// Two appends awaited back to back must both be visible to the next
    /// `get_recent`.
    fn append(
        &self,
        session_id: &str,
        turn: Turn,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
