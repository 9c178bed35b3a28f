#![forbid(unsafe_code)]

pub mod admin;
pub mod catalog;
pub mod completion;
pub mod discovery;
pub mod error;
pub mod share;
pub mod submission;

pub use attest_core::Clock;

pub use admin::AdminConfigManager;
pub use catalog::TrainingCatalog;
pub use completion::{AttemptPhase, CompletionTracker};
pub use discovery::DiscoveryParams;
pub use error::{
    AdminConfigError, CatalogError, CompletionError, ShareError, SubmissionError,
};
pub use share::ShareKeyResolver;
pub use submission::SubmissionPipeline;
