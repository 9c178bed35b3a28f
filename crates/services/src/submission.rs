use attest_core::Clock;
use attest_core::model::{Submission, SubmissionDraft, SubmissionId, TrainingId};
use storage::DocumentStore;

use crate::error::SubmissionError;

/// Validates a completed form and funnels the resulting submission into the
/// shared document.
#[derive(Clone)]
pub struct SubmissionPipeline {
    store: DocumentStore,
    clock: Clock,
}

impl SubmissionPipeline {
    #[must_use]
    pub fn new(store: DocumentStore, clock: Clock) -> Self {
        Self { store, clock }
    }

    /// Builds and persists a submission against the identified training.
    ///
    /// Validation happens before any store call. On success the latest
    /// document is fetched, the submission is appended with a fresh id, the
    /// current training name snapshotted and the submitter's company added
    /// to the document's roster, and the whole document is written back.
    /// Two parties submitting concurrently from different client instances
    /// can both fetch the same snapshot; the later write then silently
    /// drops the earlier append (lost update).
    ///
    /// Returns the constructed submission for receipt rendering.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::Validation` listing blank required fields,
    /// `SubmissionError::TrainingNotFound` for an unknown training, or
    /// `SubmissionError::Store` on store failures.
    pub async fn submit(
        &self,
        training_id: &TrainingId,
        draft: SubmissionDraft,
    ) -> Result<Submission, SubmissionError> {
        draft.validate()?;

        let mut document = self.store.fetch().await?;
        let training = document
            .training(training_id)
            .ok_or_else(|| SubmissionError::TrainingNotFound(training_id.clone()))?;

        let submission =
            Submission::from_draft(SubmissionId::generate(), training, draft, self.clock.now())?;

        document.push_submission(submission.clone())?;
        document.add_company(submission.company());
        self.store.write(&document).await?;

        tracing::info!(
            training = %training_id,
            submission = %submission.id(),
            "stored submission"
        );
        Ok(submission)
    }

    /// Removes one submission. Same fetch-filter-write pattern and race
    /// exposure as `submit`; returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::Store` on store failures.
    pub async fn delete_submission(&self, id: &SubmissionId) -> Result<bool, SubmissionError> {
        let mut document = self.store.fetch().await?;
        if !document.remove_submission(id) {
            return Ok(false);
        }
        self.store.write(&document).await?;
        Ok(true)
    }

    /// Removes every submission; returns how many were dropped.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::Store` on store failures.
    pub async fn delete_all(&self) -> Result<usize, SubmissionError> {
        let mut document = self.store.fetch().await?;
        let dropped = document.clear_submissions();
        if dropped == 0 {
            return Ok(0);
        }
        self.store.write(&document).await?;
        Ok(dropped)
    }
}
