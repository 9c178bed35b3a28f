#![forbid(unsafe_code)]

pub mod backend;
pub mod record;
pub mod remote;
pub mod store;

pub use backend::{DocumentBackend, InMemoryBackend, StoreError};
pub use remote::{RemoteBackend, RemoteConfig};
pub use store::DocumentStore;
