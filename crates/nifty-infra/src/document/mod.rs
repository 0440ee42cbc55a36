//! JSON document session store.
//!
//! One document per session under a directory, the filesystem counterpart of
//! a hosted document database. The file name is the hex SHA-256 of the
//! session id, so any client-supplied id maps to a safe, fixed-length name;
//! the id itself is kept inside the document.
//!
//! Writes go to `<name>.json.tmp` and are renamed over the document, so a
//! crash mid-write leaves the previous version intact.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use nifty_core::session::locks::SessionLocks;
use nifty_core::session::store::SessionStore;
use nifty_types::error::RepositoryError;
use nifty_types::turn::{Turn, recent_window};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

/// On-disk shape of one session.
#[derive(Debug, Serialize, Deserialize)]
struct SessionDocument {
    session_id: String,
    turns: Vec<Turn>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Filesystem-backed implementation of `SessionStore`.
pub struct DocumentSessionStore {
    dir: PathBuf,
    locks: SessionLocks,
}

impl DocumentSessionStore {
    /// Open (and create if needed) a document directory.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| RepositoryError::Io(format!("{}: {e}", dir.display())))?;
        Ok(Self {
            dir,
            locks: SessionLocks::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn document_path(&self, session_id: &str) -> PathBuf {
        let digest = Sha256::digest(session_id.as_bytes());
        self.dir.join(format!("{digest:x}.json"))
    }

    async fn load(&self, session_id: &str) -> Result<Option<SessionDocument>, RepositoryError> {
        let path = self.document_path(session_id);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RepositoryError::Io(format!("{}: {e}", path.display()))),
        };

        let doc: SessionDocument = serde_json::from_str(&raw).map_err(|e| {
            RepositoryError::Serialization(format!("invalid document {}: {e}", path.display()))
        })?;
        Ok(Some(doc))
    }

    async fn save(&self, doc: &SessionDocument) -> Result<(), RepositoryError> {
        let path = self.document_path(&doc.session_id);
        let tmp = path.with_extension("json.tmp");

        let raw = serde_json::to_vec_pretty(doc)
            .map_err(|e| RepositoryError::Serialization(format!("failed to serialize document: {e}")))?;

        tokio::fs::write(&tmp, raw)
            .await
            .map_err(|e| RepositoryError::Io(format!("{}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| RepositoryError::Io(format!("{}: {e}", path.display())))?;
        Ok(())
    }
}

impl SessionStore for DocumentSessionStore {
    async fn get_recent(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<Turn>, RepositoryError> {
        Ok(match self.load(session_id).await? {
            Some(doc) => recent_window(&doc.turns, limit).to_vec(),
            None => Vec::new(),
        })
    }

    async fn append(&self, session_id: &str, turn: Turn) -> Result<(), RepositoryError> {
        let _guard = self.locks.acquire(session_id).await;

        let now = Utc::now();
        let mut doc = self.load(session_id).await?.unwrap_or_else(|| SessionDocument {
            session_id: session_id.to_string(),
            turns: Vec::new(),
            created_at: now,
            updated_at: now,
        });
        doc.turns.push(turn);
        doc.updated_at = now;

        self.save(&doc).await?;
        debug!(session_id = %session_id, total = doc.turns.len(), "Turn appended");
        Ok(())
    }
}
