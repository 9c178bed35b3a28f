//! Shared error types for the services crate.

use thiserror::Error;

use attest_core::model::{DocumentError, SubmissionValidationError, TrainingId};
use storage::StoreError;

/// Errors emitted by `ShareKeyResolver`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ShareError {
    #[error("training {0} not found")]
    TrainingNotFound(TrainingId),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors emitted by `SubmissionPipeline`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] SubmissionValidationError),
    #[error("training {0} not found")]
    TrainingNotFound(TrainingId),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors emitted by `TrainingCatalog`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors emitted by `AdminConfigManager`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdminConfigError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors emitted by the completion gate.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum CompletionError {
    #[error("completion gate is closed at {progress:.0}%")]
    GateClosed { progress: f32 },
    #[error("submission form is not open")]
    FormNotOpen,
    #[error("attempt is already completed")]
    AlreadyCompleted,
}
