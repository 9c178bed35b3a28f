use attest_core::model::{AdminConfig, AdminConfigDraft};
use storage::DocumentStore;

use crate::error::AdminConfigError;

/// Reads and writes the administrator's signature and identity fields.
#[derive(Clone)]
pub struct AdminConfigManager {
    store: DocumentStore,
}

impl AdminConfigManager {
    #[must_use]
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Loads the current admin configuration.
    ///
    /// # Errors
    ///
    /// Returns `AdminConfigError::Store` on store failures.
    pub async fn load(&self) -> Result<AdminConfig, AdminConfigError> {
        let document = self.store.fetch().await?;
        Ok(document.admin_config().clone())
    }

    /// Normalizes and persists new admin configuration. Single copy,
    /// last write wins.
    ///
    /// # Errors
    ///
    /// Returns `AdminConfigError::Store` on store failures.
    pub async fn save(&self, draft: AdminConfigDraft) -> Result<AdminConfig, AdminConfigError> {
        let config = draft.normalize();
        let mut document = self.store.fetch().await?;
        document.set_admin_config(config.clone());
        self.store.write(&document).await?;
        Ok(config)
    }
}
