//! Draft storage backends.
//!
//! Draft storage is strictly best-effort: every failure is logged and
//! swallowed so a broken disk or spool directory can never block editing.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Filename prefix for per-task draft files.
pub const DRAFT_KEY_PREFIX: &str = "draft_task_";

/// One saved transcript draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub text: String,
    /// Milliseconds since the Unix epoch at the time of the save.
    pub timestamp: i64,
}

impl Draft {
    /// A draft of `text` stamped with the current time.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Persistence backend for per-task drafts.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// The stored draft for a task, if one exists and is readable.
    async fn load(&self, task_id: &str) -> Option<Draft>;

    /// Store a draft for a task, replacing any previous one.
    async fn save(&self, task_id: &str, draft: &Draft);

    /// Delete the stored draft for a task, if any.
    async fn remove(&self, task_id: &str);
}

// ---------------------------------------------------------------------------
// Filesystem backend
// ---------------------------------------------------------------------------

/// Draft store writing one JSON file per task under a spool directory.
pub struct FsDraftStore {
    dir: PathBuf,
}

impl FsDraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, task_id: &str) -> PathBuf {
        self.dir.join(format!("{DRAFT_KEY_PREFIX}{task_id}.json"))
    }
}

#[async_trait]
impl DraftStore for FsDraftStore {
    async fn load(&self, task_id: &str) -> Option<Draft> {
        let path = self.path_for(task_id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(task_id = %task_id, error = %e, "Failed to read draft file");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(draft) => Some(draft),
            Err(e) => {
                tracing::warn!(task_id = %task_id, error = %e, "Discarding corrupt draft file");
                None
            }
        }
    }

    async fn save(&self, task_id: &str, draft: &Draft) {
        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            tracing::warn!(error = %e, "Failed to create draft directory");
            return;
        }
        let path = self.path_for(task_id);
        let json = match serde_json::to_vec(draft) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(task_id = %task_id, error = %e, "Failed to encode draft");
                return;
            }
        };
        if let Err(e) = tokio::fs::write(&path, &json).await {
            tracing::warn!(task_id = %task_id, error = %e, "Failed to write draft file");
        }
    }

    async fn remove(&self, task_id: &str) {
        let path = self.path_for(task_id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(task_id = %task_id, error = %e, "Failed to remove draft file");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

/// Draft store backed by a map. Used in tests and as the degraded mode
/// when no spool directory is usable.
#[derive(Default)]
pub struct MemoryDraftStore {
    drafts: Mutex<HashMap<String, Draft>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored drafts.
    pub async fn len(&self) -> usize {
        self.drafts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.drafts.lock().await.is_empty()
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn load(&self, task_id: &str) -> Option<Draft> {
        self.drafts.lock().await.get(task_id).cloned()
    }

    async fn save(&self, task_id: &str, draft: &Draft) {
        self.drafts
            .lock()
            .await
            .insert(task_id.to_string(), draft.clone());
    }

    async fn remove(&self, task_id: &str) {
        self.drafts.lock().await.remove(task_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fs_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsDraftStore::new(dir.path());

        assert_eq!(store.load("t1").await, None);

        let draft = Draft::new("half-typed transcript");
        store.save("t1", &draft).await;
        assert_eq!(store.load("t1").await, Some(draft));

        store.remove("t1").await;
        assert_eq!(store.load("t1").await, None);
    }

    #[tokio::test]
    async fn fs_store_files_are_keyed_by_task() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsDraftStore::new(dir.path());

        store.save("t1", &Draft::new("one")).await;
        store.save("t2", &Draft::new("two")).await;

        assert!(dir.path().join("draft_task_t1.json").exists());
        assert!(dir.path().join("draft_task_t2.json").exists());
        assert_eq!(store.load("t1").await.unwrap().text, "one");
        assert_eq!(store.load("t2").await.unwrap().text, "two");
    }

    #[tokio::test]
    async fn fs_store_removing_a_missing_draft_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsDraftStore::new(dir.path());
        store.remove("never-saved").await;
    }

    #[tokio::test]
    async fn fs_store_survives_a_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsDraftStore::new(dir.path());

        tokio::fs::write(dir.path().join("draft_task_t1.json"), b"{not json")
            .await
            .unwrap();
        assert_eq!(store.load("t1").await, None);
    }

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryDraftStore::new();
        store.save("t1", &Draft::new("text")).await;
        assert_eq!(store.load("t1").await.unwrap().text, "text");
        store.remove("t1").await;
        assert!(store.is_empty().await);
    }
}
