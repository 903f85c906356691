//! Saved-progress repository.

use std::sync::Arc;

use tracing::{debug, info, warn};

use foobi_models::SavedProgress;

use crate::error::StorageResult;
use crate::store::KeyValueStore;

/// Storage key of the single remembered draft.
pub const DEFAULT_PROGRESS_KEY: &str = "foobi_progress";

/// Reads and writes the one in-flight [`SavedProgress`] snapshot.
///
/// Writes are last-write-wins. A snapshot that cannot be parsed is
/// discarded and reported as absent.
#[derive(Clone)]
pub struct ProgressRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl ProgressRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Repository using [`DEFAULT_PROGRESS_KEY`].
    pub fn with_default_key(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(store, DEFAULT_PROGRESS_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Replace the stored snapshot.
    pub async fn save(&self, progress: &SavedProgress) -> StorageResult<()> {
        let raw = serde_json::to_string(progress)?;
        self.store.put(&self.key, &raw).await?;
        debug!(
            key = %self.key,
            state = %progress.state,
            step = progress.step.number(),
            "Saved wizard progress"
        );
        Ok(())
    }

    /// Load the stored snapshot, if any.
    ///
    /// Never fails: read errors and corrupt values are logged and yield `None`.
    pub async fn load(&self) -> Option<SavedProgress> {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read saved progress");
                return None;
            }
        };

        match serde_json::from_str::<SavedProgress>(&raw) {
            Ok(progress) => Some(progress),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding unparseable saved progress");
                if let Err(e) = self.store.delete(&self.key).await {
                    warn!(key = %self.key, error = %e, "Failed to remove corrupt saved progress");
                }
                None
            }
        }
    }

    /// Whether a usable snapshot exists.
    pub async fn exists(&self) -> bool {
        self.load().await.is_some()
    }

    /// Remove the stored snapshot.
    pub async fn clear(&self) -> StorageResult<()> {
        self.store.delete(&self.key).await?;
        info!(key = %self.key, "Cleared saved progress");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use foobi_models::{Draft, WizardScreen, WizardStep};

    fn progress() -> SavedProgress {
        let mut draft = Draft::new();
        draft.video_title = "新商品の魅力を伝える動画".to_string();
        SavedProgress {
            state: WizardScreen::VideoDetails,
            step: WizardStep::Details,
            draft,
            edited_concept: None,
        }
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let repo = ProgressRepository::with_default_key(Arc::new(MemoryStore::new()));
        repo.save(&progress()).await.unwrap();
        assert_eq!(repo.load().await, Some(progress()));
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_absent_and_removed() {
        let store = Arc::new(MemoryStore::new());
        store.put(DEFAULT_PROGRESS_KEY, "{not json").await.unwrap();

        let repo = ProgressRepository::with_default_key(store.clone());
        assert_eq!(repo.load().await, None);
        assert!(!repo.exists().await);
        assert_eq!(store.get(DEFAULT_PROGRESS_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear() {
        let repo = ProgressRepository::with_default_key(Arc::new(MemoryStore::new()));
        repo.save(&progress()).await.unwrap();
        repo.clear().await.unwrap();
        assert!(!repo.exists().await);
    }
}
