use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use attest_core::model::Document;

use crate::backend::{DocumentBackend, StoreError};
use crate::record::DocumentRecord;

/// Access point for the single remote document.
///
/// Every mutation elsewhere in the system follows the same discipline:
/// `fetch` the latest document, transform it in memory, `write` the whole
/// thing back. The window between fetch and write is a race window — a
/// concurrent writer's change lands silently under the later write. The
/// store does not and cannot detect that; the remote has no version tokens.
///
/// One store instance allows a single outstanding operation at a time
/// (clones share the instance's guard). The guard protects an instance
/// against itself only; it does not order writers across instances.
#[derive(Clone)]
pub struct DocumentStore {
    backend: Arc<dyn DocumentBackend>,
    in_flight: Arc<AtomicBool>,
}

impl DocumentStore {
    #[must_use]
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            backend,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Retrieves the remote document, back-filling defaults for any
    /// top-level field the stored value omits.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Busy` if another operation from this instance
    /// is outstanding, or the backend's configuration/credential/transport
    /// errors.
    pub async fn fetch(&self) -> Result<Document, StoreError> {
        let _permit = self.begin("fetch")?;

        let value = self.backend.load().await?;
        let record: DocumentRecord = serde_json::from_value(value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let document = record
            .into_document()
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        tracing::debug!(
            trainings = document.trainings().len(),
            submissions = document.submissions().len(),
            "fetched document"
        );
        Ok(document)
    }

    /// Replaces the entire remote document with `document`.
    ///
    /// This is not a merge: changes made by another writer since this
    /// caller's last `fetch` are discarded unless the caller re-incorporated
    /// them.
    ///
    /// # Errors
    ///
    /// Same kinds as [`DocumentStore::fetch`].
    pub async fn write(&self, document: &Document) -> Result<(), StoreError> {
        let _permit = self.begin("write")?;

        let record = DocumentRecord::from_document(document);
        let value = serde_json::to_value(&record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.backend.store(&value).await?;

        tracing::debug!(
            trainings = document.trainings().len(),
            submissions = document.submissions().len(),
            "wrote document"
        );
        Ok(())
    }

    fn begin(&self, operation: &str) -> Result<FlightPermit, StoreError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!(operation, "rejected store call: operation already in flight");
            return Err(StoreError::Busy);
        }
        Ok(FlightPermit {
            flag: Arc::clone(&self.in_flight),
        })
    }
}

/// Explicit single-flight token; releases the instance's guard on drop, so
/// failed operations free the store too.
struct FlightPermit {
    flag: Arc<AtomicBool>,
}

impl Drop for FlightPermit {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
