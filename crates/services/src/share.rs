use attest_core::Clock;
use attest_core::model::{ShareKey, Training, TrainingId};
use storage::DocumentStore;

use crate::error::ShareError;

/// Resolves opaque share keys to trainings and lazily assigns keys on the
/// first share request.
#[derive(Clone)]
pub struct ShareKeyResolver {
    store: DocumentStore,
    clock: Clock,
}

impl ShareKeyResolver {
    #[must_use]
    pub fn new(store: DocumentStore, clock: Clock) -> Self {
        Self { store, clock }
    }

    /// Looks up the training carrying `key`.
    ///
    /// Every resolution is a fresh fetch and a linear scan; share keys are
    /// dereferenced rarely, by a new party, so nothing is cached.
    ///
    /// # Errors
    ///
    /// Returns `ShareError::Store` on store failures.
    pub async fn resolve(&self, key: &ShareKey) -> Result<Option<Training>, ShareError> {
        let document = self.store.fetch().await?;
        Ok(document.training_by_share_key(key).cloned())
    }

    /// Returns the training's permanent share key, minting one on first use.
    ///
    /// The caller may hold a stale copy of the training, so even the
    /// already-shared path fetches the latest document. When no key exists
    /// yet this is a fetch → assign → write of the whole document; two
    /// client instances racing here can both mint a key, the later write
    /// wins and the loser's key never resolves.
    ///
    /// # Errors
    ///
    /// Returns `ShareError::TrainingNotFound` for an unknown id, or
    /// `ShareError::Store` on store failures.
    pub async fn ensure_shared(&self, training_id: &TrainingId) -> Result<ShareKey, ShareError> {
        let mut document = self.store.fetch().await?;

        let training = document
            .training(training_id)
            .ok_or_else(|| ShareError::TrainingNotFound(training_id.clone()))?;
        if let Some(key) = training.share_key() {
            return Ok(key.clone());
        }

        let key = ShareKey::mint(training_id, self.clock.now());
        document.assign_share_key(training_id, key.clone())?;
        self.store.write(&document).await?;

        tracing::info!(training = %training_id, "assigned share key");
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_core::model::{Document, Link, LinkId};
    use attest_core::time::fixed_clock;
    use std::sync::Arc;
    use storage::InMemoryBackend;

    async fn store_with_training(id: &str) -> DocumentStore {
        let mut document = Document::new();
        document
            .upsert_training(
                Training::new(
                    TrainingId::new(id),
                    format!("Training {id}"),
                    vec![Link::new(LinkId::new("l1"), None, "https://example.com").unwrap()],
                    vec![],
                )
                .unwrap(),
            )
            .unwrap();

        let store = DocumentStore::new(Arc::new(InMemoryBackend::new()));
        store.write(&document).await.unwrap();
        store
    }

    #[tokio::test]
    async fn ensure_shared_mints_once_and_is_stable() {
        let store = store_with_training("t1").await;
        let resolver = ShareKeyResolver::new(store, fixed_clock());

        let first = resolver
            .ensure_shared(&TrainingId::new("t1"))
            .await
            .unwrap();
        let second = resolver
            .ensure_shared(&TrainingId::new("t1"))
            .await
            .unwrap();
        assert_eq!(first, second);

        let resolved = resolver.resolve(&first).await.unwrap().unwrap();
        assert_eq!(resolved.id(), &TrainingId::new("t1"));
    }

    #[tokio::test]
    async fn ensure_shared_unknown_training() {
        let store = store_with_training("t1").await;
        let resolver = ShareKeyResolver::new(store, fixed_clock());

        let err = resolver
            .ensure_shared(&TrainingId::new("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, ShareError::TrainingNotFound(_)));
    }

    #[tokio::test]
    async fn resolve_unknown_key_is_none() {
        let store = store_with_training("t1").await;
        let resolver = ShareKeyResolver::new(store, fixed_clock());

        let found = resolver.resolve(&ShareKey::new("dangling")).await.unwrap();
        assert!(found.is_none());
    }
}
