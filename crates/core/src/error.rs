use thiserror::Error;

use crate::model::{DocumentError, SubmissionValidationError, TrainingError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Training(#[from] TrainingError),
    #[error(transparent)]
    Submission(#[from] SubmissionValidationError),
    #[error(transparent)]
    Document(#[from] DocumentError),
}
