mod admin_config;
mod document;
mod ids;
mod submission;
mod training;

pub use admin_config::{AdminConfig, AdminConfigDraft};
pub use document::{Document, DocumentError, fold_company_name};
pub use ids::{LinkId, SubmissionId, TrainingId};
pub use submission::{
    SignatureImage, Submission, SubmissionDraft, SubmissionField, SubmissionValidationError,
};
pub use training::{Link, ShareKey, Training, TrainingError};

/// Trims an optional string, mapping blank values to `None`.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
