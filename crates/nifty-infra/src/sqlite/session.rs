//! SQLite session store implementation.
//!
//! Implements `SessionStore` from `nifty-core` using sqlx with split read/write
//! pools. Each session is a single row whose `turns` column holds the whole
//! turn list as JSON; appends rewrite that column under the session's lock.

use chrono::Utc;
use nifty_core::session::locks::SessionLocks;
use nifty_core::session::store::SessionStore;
use nifty_types::error::RepositoryError;
use nifty_types::turn::{Turn, recent_window};
use sqlx::Row;
use sqlx::SqlitePool;
use tracing::debug;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `SessionStore`.
pub struct SqliteSessionStore {
    pool: DatabasePool,
    locks: SessionLocks,
}

impl SqliteSessionStore {
    /// Create a new session store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            pool,
            locks: SessionLocks::new(),
        }
    }

    /// Load the full turn list for a session from `pool`.
    async fn load_turns(
        pool: &SqlitePool,
        session_id: &str,
    ) -> Result<Option<Vec<Turn>>, RepositoryError> {
        let row = sqlx::query("SELECT turns FROM sessions WHERE id = ?")
            .bind(session_id)
            .fetch_optional(pool)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let raw: String = row
                    .try_get("turns")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                let turns: Vec<Turn> = serde_json::from_str(&raw).map_err(|e| {
                    RepositoryError::Serialization(format!("invalid turns JSON: {e}"))
                })?;
                Ok(Some(turns))
            }
            None => Ok(None),
        }
    }
}

impl SessionStore for SqliteSessionStore {
    async fn get_recent(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<Turn>, RepositoryError> {
        let turns = Self::load_turns(&self.pool.reader, session_id)
            .await?
            .unwrap_or_default();
        Ok(recent_window(&turns, limit).to_vec())
    }

    async fn append(&self, session_id: &str, turn: Turn) -> Result<(), RepositoryError> {
        let _guard = self.locks.acquire(session_id).await;

        // Read through the writer so the latest committed list is seen.
        let mut turns = Self::load_turns(&self.pool.writer, session_id)
            .await?
            .unwrap_or_default();
        turns.push(turn);

        let raw = serde_json::to_string(&turns)
            .map_err(|e| RepositoryError::Serialization(format!("failed to serialize turns: {e}")))?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO sessions (id, turns, created_at, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT (id) DO UPDATE SET turns = excluded.turns, updated_at = excluded.updated_at"#,
        )
        .bind(session_id)
        .bind(&raw)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        debug!(session_id = %session_id, total = turns.len(), "Turn appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::sqlite::pool::DatabasePool;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    #[tokio::test]
    async fn test_unknown_session_is_empty() {
        let store = SqliteSessionStore::new(test_pool().await);
        let turns = store.get_recent("nobody", 20).await.unwrap();
        assert!(turns.is_empty());
    }

    #[tokio::test]
    async fn test_append_then_read_in_order() {
        let store = SqliteSessionStore::new(test_pool().await);
        store.append("s1", Turn::user("hello")).await.unwrap();
        store.append("s1", Turn::assistant("hi!")).await.unwrap();
        store.append("s1", Turn::user("time?")).await.unwrap();

        let turns = store.get_recent("s1", 20).await.unwrap();
        assert_eq!(
            turns,
            vec![Turn::user("hello"), Turn::assistant("hi!"), Turn::user("time?")]
        );
    }

    #[tokio::test]
    async fn test_window_returns_latest_twenty_of_a_thousand() {
        let pool = test_pool().await;
        let all: Vec<Turn> = (0..1000).map(|i| Turn::user(format!("m{i}"))).collect();
        let now = Utc::now().to_rfc3339();
        sqlx::query("INSERT INTO sessions (id, turns, created_at, updated_at) VALUES (?, ?, ?, ?)")
            .bind("big")
            .bind(serde_json::to_string(&all).unwrap())
            .bind(&now)
            .bind(&now)
            .execute(&pool.writer)
            .await
            .unwrap();

        let store = SqliteSessionStore::new(pool);
        store.append("big", Turn::assistant("m1000")).await.unwrap();

        let window = store.get_recent("big", 20).await.unwrap();
        assert_eq!(window.len(), 20);
        let texts: Vec<String> = window.into_iter().map(|t| t.text).collect();
        let expected: Vec<String> = (981..=1000).map(|i| format!("m{i}")).collect();
        assert_eq!(texts, expected);
    }

    #[tokio::test]
    async fn test_zero_limit_is_empty() {
        let store = SqliteSessionStore::new(test_pool().await);
        store.append("s1", Turn::user("hello")).await.unwrap();
        assert!(store.get_recent("s1", 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SqliteSessionStore::new(test_pool().await);
        store.append("a", Turn::user("from a")).await.unwrap();
        store.append("b", Turn::user("from b")).await.unwrap();

        assert_eq!(store.get_recent("a", 20).await.unwrap(), vec![Turn::user("from a")]);
        assert_eq!(store.get_recent("b", 20).await.unwrap(), vec![Turn::user("from b")]);
    }

    #[tokio::test]
    async fn test_duplicate_turns_are_kept() {
        let store = SqliteSessionStore::new(test_pool().await);
        store.append("s1", Turn::user("again")).await.unwrap();
        store.append("s1", Turn::user("again")).await.unwrap();
        assert_eq!(store.get_recent("s1", 20).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_appends_to_one_session_all_survive() {
        let store = Arc::new(SqliteSessionStore::new(test_pool().await));

        let mut handles = Vec::new();
        for i in 0..25 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.append("shared", Turn::user(format!("m{i}"))).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let turns = store.get_recent("shared", 100).await.unwrap();
        assert_eq!(turns.len(), 25, "per-session lock must prevent lost updates");
    }

    #[tokio::test]
    async fn test_finished_sessions_release_their_locks() {
        let store = Arc::new(SqliteSessionStore::new(test_pool().await));

        let mut handles = Vec::new();
        for i in 0..50 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.append(&format!("sess-{}", i % 10), Turn::user("hi")).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(store.locks.is_empty());
        assert_eq!(store.get_recent("sess-3", 20).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_corrupt_row_is_a_serialization_error() {
        let pool = test_pool().await;
        let now = Utc::now().to_rfc3339();
        sqlx::query("INSERT INTO sessions (id, turns, created_at, updated_at) VALUES (?, ?, ?, ?)")
            .bind("bad")
            .bind("not json")
            .bind(&now)
            .bind(&now)
            .execute(&pool.writer)
            .await
            .unwrap();

        let store = SqliteSessionStore::new(pool);
        let err = store.get_recent("bad", 20).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Serialization(_)));
    }
}
