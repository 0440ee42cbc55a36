//! Per-session append serialization.
//!
//! Both session stores append by reading the whole turn list, pushing one
//! turn, and writing the whole list back. Two unsynchronized appends to the
//! same session would race and the last full write would win, dropping a
//! turn. Stores hold a `SessionLocks` and take the session's lock around the
//! read-modify-write so appends within one process never lose updates.
//!
//! Separate processes sharing one database or document directory are not
//! covered; there the last full write still wins.
//!
//! An entry lives only while some append holds or waits for it, so the table
//! stays as small as the number of sessions being written right now.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockTable = DashMap<String, Arc<Mutex<()>>>;

/// Lazily created mutex per session id.
#[derive(Default)]
pub struct SessionLocks {
    locks: LockTable,
}

/// Exclusive access to one session. Dropping it unlocks the session and
/// removes its entry when nobody else is waiting.
pub struct SessionGuard<'a> {
    guard: Option<OwnedMutexGuard<()>>,
    locks: &'a LockTable,
    session_id: String,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        // Unlock first so the strong count reflects only the table and waiters.
        drop(self.guard.take());
        self.locks
            .remove_if(&self.session_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `session_id`.
    ///
    /// Cancelling the wait also drops the entry if it was the last user.
    pub async fn acquire(&self, session_id: &str) -> SessionGuard<'_> {
        let mut session = SessionGuard {
            guard: None,
            locks: &self.locks,
            session_id: session_id.to_string(),
        };
        let lock = self
            .locks
            .entry(session_id.to_string())
            .or_default()
            .clone();
        session.guard = Some(lock.lock_owned().await);
        session
    }

    /// Number of sessions currently locked or waited on.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
