use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by the document store and its backends.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The remote store is not provisioned; callers should stop issuing
    /// store calls.
    #[error("remote store is not configured: {0}")]
    Config(String),

    /// The remote store rejected the attached credential.
    #[error("store credential rejected with status {0}")]
    Auth(reqwest::StatusCode),

    /// Transport failure or unexpected remote status.
    #[error("store request failed: {0}")]
    Network(String),

    /// Another fetch/write from this client instance is still in flight.
    #[error("another store operation from this client is in flight")]
    Busy,

    /// The stored document could not be encoded or decoded.
    #[error("stored document could not be decoded: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Network(err.to_string())
    }
}

/// Transport seam for the single remote document.
///
/// The native remote primitive is "replace the whole blob"; backends expose
/// exactly that and nothing more. There is no compare-and-swap, patching, or
/// version token.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Loads the latest raw document value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on configuration, credential, or transport
    /// failure.
    async fn load(&self) -> Result<Value, StoreError>;

    /// Replaces the whole remote document with `document`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on configuration, credential, or transport
    /// failure.
    async fn store(&self, document: &Value) -> Result<(), StoreError>;
}

/// In-memory backend for tests and prototyping.
///
/// Several store instances can share one backend, which is exactly how the
/// multi-writer race scenarios are reproduced in tests. Call counters let
/// tests assert that an operation performed no store traffic.
#[derive(Clone)]
pub struct InMemoryBackend {
    value: Arc<Mutex<Value>>,
    loads: Arc<AtomicUsize>,
    stores: Arc<AtomicUsize>,
}

impl InMemoryBackend {
    /// Creates a backend holding an empty document value.
    #[must_use]
    pub fn new() -> Self {
        Self::with_value(Value::Object(serde_json::Map::new()))
    }

    /// Creates a backend seeded with `value`.
    #[must_use]
    pub fn with_value(value: Value) -> Self {
        Self {
            value: Arc::new(Mutex::new(value)),
            loads: Arc::new(AtomicUsize::new(0)),
            stores: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `load` calls served so far.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    /// Number of `store` calls served so far.
    #[must_use]
    pub fn store_count(&self) -> usize {
        self.stores.load(Ordering::Relaxed)
    }

    /// Returns a copy of the currently stored value.
    ///
    /// # Panics
    ///
    /// Panics if the backing mutex is poisoned.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        self.value.lock().expect("backend mutex poisoned").clone()
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentBackend for InMemoryBackend {
    async fn load(&self) -> Result<Value, StoreError> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        let guard = self
            .value
            .lock()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn store(&self, document: &Value) -> Result<(), StoreError> {
        self.stores.fetch_add(1, Ordering::Relaxed);
        let mut guard = self
            .value
            .lock()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        *guard = document.clone();
        Ok(())
    }
}
