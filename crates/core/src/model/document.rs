use thiserror::Error;

use crate::model::admin_config::AdminConfig;
use crate::model::ids::{SubmissionId, TrainingId};
use crate::model::submission::Submission;
use crate::model::training::{ShareKey, Training};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DocumentError {
    #[error("duplicate training id {0}")]
    DuplicateTrainingId(TrainingId),

    #[error("duplicate submission id {0}")]
    DuplicateSubmissionId(SubmissionId),

    #[error("share key {0} is already assigned to another training")]
    DuplicateShareKey(ShareKey),

    #[error("training {0} not found in document")]
    TrainingNotFound(TrainingId),

    #[error("training {0} already has a share key")]
    ShareKeyImmutable(TrainingId),
}

//
// ─── COMPANY NAME FOLDING ──────────────────────────────────────────────────────
//

/// Folds a company name for dedup comparison: lowercase, trimmed, with the
/// Latin diacritics common in Spanish names removed. Storage keeps the
/// original spelling; only comparisons fold.
#[must_use]
pub fn fold_company_name(name: &str) -> String {
    name.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

//
// ─── DOCUMENT ──────────────────────────────────────────────────────────────────
//

/// The single persisted aggregate: all submissions, trainings, known company
/// names and the admin configuration.
///
/// Every mutation of remote state replaces this whole value through the
/// store; there is no per-entity persistence. Consumers never see absent
/// containers because the store back-fills defaults on read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    submissions: Vec<Submission>,
    trainings: Vec<Training>,
    companies: Vec<String>,
    admin_config: AdminConfig,
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a document from persisted parts, enforcing the document-wide
    /// invariants.
    ///
    /// Company names are deduplicated under folded comparison, keeping the
    /// first spelling seen.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError` on duplicate training ids, duplicate
    /// submission ids, or duplicate share keys.
    pub fn from_parts(
        submissions: Vec<Submission>,
        trainings: Vec<Training>,
        companies: Vec<String>,
        admin_config: AdminConfig,
    ) -> Result<Self, DocumentError> {
        for (i, training) in trainings.iter().enumerate() {
            if trainings[..i].iter().any(|t| t.id() == training.id()) {
                return Err(DocumentError::DuplicateTrainingId(training.id().clone()));
            }
            if let Some(key) = training.share_key() {
                if trainings[..i].iter().any(|t| t.share_key() == Some(key)) {
                    return Err(DocumentError::DuplicateShareKey(key.clone()));
                }
            }
        }

        for (i, submission) in submissions.iter().enumerate() {
            if submissions[..i].iter().any(|s| s.id() == submission.id()) {
                return Err(DocumentError::DuplicateSubmissionId(
                    submission.id().clone(),
                ));
            }
        }

        let mut document = Self {
            submissions,
            trainings,
            companies: Vec::new(),
            admin_config,
        };
        for company in companies {
            document.add_company(&company);
        }

        Ok(document)
    }

    // ── Accessors ──

    /// Submissions in arrival order.
    #[must_use]
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    #[must_use]
    pub fn trainings(&self) -> &[Training] {
        &self.trainings
    }

    /// Distinct company names, original spelling preserved.
    #[must_use]
    pub fn companies(&self) -> &[String] {
        &self.companies
    }

    #[must_use]
    pub fn admin_config(&self) -> &AdminConfig {
        &self.admin_config
    }

    #[must_use]
    pub fn training(&self, id: &TrainingId) -> Option<&Training> {
        self.trainings.iter().find(|t| t.id() == id)
    }

    /// Linear scan for the training carrying `key`.
    #[must_use]
    pub fn training_by_share_key(&self, key: &ShareKey) -> Option<&Training> {
        self.trainings.iter().find(|t| t.share_key() == Some(key))
    }

    // ── Trainings ──

    /// Inserts a training, or replaces the one with the same id (admin edits
    /// replace the whole training).
    ///
    /// A share key already on the stored training is carried onto the
    /// replacement when the replacement has none.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::ShareKeyImmutable` if the replacement tries
    /// to change an assigned key, or `DocumentError::DuplicateShareKey` if
    /// its key is already used by another training.
    pub fn upsert_training(&mut self, mut training: Training) -> Result<(), DocumentError> {
        if let Some(key) = training.share_key() {
            let taken = self
                .trainings
                .iter()
                .any(|t| t.id() != training.id() && t.share_key() == Some(key));
            if taken {
                return Err(DocumentError::DuplicateShareKey(key.clone()));
            }
        }

        match self.trainings.iter_mut().find(|t| t.id() == training.id()) {
            Some(existing) => {
                match (existing.share_key(), training.share_key()) {
                    (Some(current), Some(incoming)) if current != incoming => {
                        return Err(DocumentError::ShareKeyImmutable(
                            training.id().clone(),
                        ));
                    }
                    (Some(current), None) => {
                        training.set_share_key(current.clone());
                    }
                    _ => {}
                }
                *existing = training;
            }
            None => self.trainings.push(training),
        }
        Ok(())
    }

    /// Removes the training with `id`. Existing submissions keep their
    /// denormalized training name.
    pub fn remove_training(&mut self, id: &TrainingId) -> bool {
        let before = self.trainings.len();
        self.trainings.retain(|t| t.id() != id);
        self.trainings.len() < before
    }

    /// Assigns a share key to the identified training, once.
    ///
    /// # Errors
    ///
    /// Returns `TrainingNotFound` for an unknown id, `ShareKeyImmutable` if
    /// the training already has a key, or `DuplicateShareKey` if `key` is
    /// used elsewhere in the document.
    pub fn assign_share_key(
        &mut self,
        id: &TrainingId,
        key: ShareKey,
    ) -> Result<(), DocumentError> {
        if self.trainings.iter().any(|t| t.share_key() == Some(&key)) {
            return Err(DocumentError::DuplicateShareKey(key));
        }

        let training = self
            .trainings
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or_else(|| DocumentError::TrainingNotFound(id.clone()))?;

        if training.share_key().is_some() {
            return Err(DocumentError::ShareKeyImmutable(id.clone()));
        }

        training.set_share_key(key);
        Ok(())
    }

    // ── Submissions ──

    /// Appends a submission; arrival order is preserved.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::DuplicateSubmissionId` if the id is taken.
    pub fn push_submission(&mut self, submission: Submission) -> Result<(), DocumentError> {
        if self.submissions.iter().any(|s| s.id() == submission.id()) {
            return Err(DocumentError::DuplicateSubmissionId(
                submission.id().clone(),
            ));
        }
        self.submissions.push(submission);
        Ok(())
    }

    /// Removes the submission with `id`, if present.
    pub fn remove_submission(&mut self, id: &SubmissionId) -> bool {
        let before = self.submissions.len();
        self.submissions.retain(|s| s.id() != id);
        self.submissions.len() < before
    }

    /// Removes every submission; returns how many were dropped.
    pub fn clear_submissions(&mut self) -> usize {
        let dropped = self.submissions.len();
        self.submissions.clear();
        dropped
    }

    // ── Companies ──

    /// Records a company name unless an equivalent spelling is already
    /// known. Returns whether the name was added.
    pub fn add_company(&mut self, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return false;
        }

        let folded = fold_company_name(trimmed);
        if self
            .companies
            .iter()
            .any(|known| fold_company_name(known) == folded)
        {
            return false;
        }

        self.companies.push(trimmed.to_owned());
        true
    }

    // ── Admin config ──

    /// Replaces the admin configuration. Last write wins.
    pub fn set_admin_config(&mut self, config: AdminConfig) {
        self.admin_config = config;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
