use attest_core::model::{Training, TrainingId};
use storage::DocumentStore;

use crate::error::CatalogError;

/// Admin surface for publishing and editing trainings.
///
/// Every mutation is the usual fetch → transform → whole-document write.
#[derive(Clone)]
pub struct TrainingCatalog {
    store: DocumentStore,
}

impl TrainingCatalog {
    #[must_use]
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Lists all published trainings.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` on store failures.
    pub async fn list(&self) -> Result<Vec<Training>, CatalogError> {
        let document = self.store.fetch().await?;
        Ok(document.trainings().to_vec())
    }

    /// Fetches one training by id; `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` on store failures.
    pub async fn get(&self, id: &TrainingId) -> Result<Option<Training>, CatalogError> {
        let document = self.store.fetch().await?;
        Ok(document.training(id).cloned())
    }

    /// Publishes a training, or replaces the stored one with the same id.
    ///
    /// An already-assigned share key survives the edit; the document layer
    /// rejects attempts to change it.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Document` if the edit violates a document
    /// invariant, or `CatalogError::Store` on store failures.
    pub async fn save(&self, training: Training) -> Result<(), CatalogError> {
        let mut document = self.store.fetch().await?;
        document.upsert_training(training)?;
        self.store.write(&document).await?;
        Ok(())
    }

    /// Deletes a training; existing submissions keep their denormalized
    /// training name. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` on store failures.
    pub async fn delete(&self, id: &TrainingId) -> Result<bool, CatalogError> {
        let mut document = self.store.fetch().await?;
        if !document.remove_training(id) {
            return Ok(false);
        }
        self.store.write(&document).await?;
        Ok(true)
    }
}
