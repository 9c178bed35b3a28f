use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::model::ids::{SubmissionId, TrainingId};
use crate::model::normalize_optional;
use crate::model::training::Training;

//
// ─── SIGNATURE ─────────────────────────────────────────────────────────────────
//

/// Opaque, non-empty signature image payload (whatever the capture
/// collaborator produced, typically a data URL).
#[derive(Clone, PartialEq, Eq)]
pub struct SignatureImage(String);

impl SignatureImage {
    /// Wraps a signature payload; returns `None` for blank input.
    #[must_use]
    pub fn new(data: impl Into<String>) -> Option<Self> {
        let data = data.into();
        if data.trim().is_empty() {
            return None;
        }
        Some(Self(data))
    }

    /// Returns the raw payload.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Payloads are large base64 blobs; keep Debug output readable.
impl fmt::Debug for SignatureImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignatureImage({} bytes)", self.0.len())
    }
}

//
// ─── VALIDATION ────────────────────────────────────────────────────────────────
//

/// Required fields of the submission form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionField {
    FirstName,
    LastName,
    Dni,
    Company,
    Signature,
}

impl fmt::Display for SubmissionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubmissionField::FirstName => "first name",
            SubmissionField::LastName => "last name",
            SubmissionField::Dni => "dni",
            SubmissionField::Company => "company",
            SubmissionField::Signature => "signature",
        };
        write!(f, "{name}")
    }
}

/// Raised before any store access when required form fields are blank.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("missing required fields: {}", list_fields(.missing))]
pub struct SubmissionValidationError {
    pub missing: Vec<SubmissionField>,
}

fn list_fields(fields: &[SubmissionField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Raw submission form contents, as collected by the UI collaborator.
#[derive(Clone, Debug, Default)]
pub struct SubmissionDraft {
    pub first_name: String,
    pub last_name: String,
    pub dni: String,
    pub company: String,
    pub signature: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl SubmissionDraft {
    /// Checks that every required field is present.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionValidationError` listing every blank required
    /// field.
    pub fn validate(&self) -> Result<(), SubmissionValidationError> {
        let mut missing = Vec::new();
        if self.first_name.trim().is_empty() {
            missing.push(SubmissionField::FirstName);
        }
        if self.last_name.trim().is_empty() {
            missing.push(SubmissionField::LastName);
        }
        if self.dni.trim().is_empty() {
            missing.push(SubmissionField::Dni);
        }
        if self.company.trim().is_empty() {
            missing.push(SubmissionField::Company);
        }
        if self.signature.trim().is_empty() {
            missing.push(SubmissionField::Signature);
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SubmissionValidationError { missing })
        }
    }
}

//
// ─── SUBMISSION ────────────────────────────────────────────────────────────────
//

/// A signed attendance record, created exactly once and immutable afterwards.
///
/// The training name is a snapshot taken at submission time so the record
/// survives later training edits and deletions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    id: SubmissionId,
    training_id: TrainingId,
    training_name: String,
    first_name: String,
    last_name: String,
    dni: String,
    company: String,
    signature: SignatureImage,
    submitted_at: DateTime<Utc>,
    email: Option<String>,
    phone: Option<String>,
}

impl Submission {
    /// Builds a submission from a validated form against the training's
    /// current state.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionValidationError` if required fields are blank.
    pub fn from_draft(
        id: SubmissionId,
        training: &Training,
        draft: SubmissionDraft,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, SubmissionValidationError> {
        Self::build(
            id,
            training.id().clone(),
            training.name().to_owned(),
            draft,
            submitted_at,
        )
    }

    /// Rebuilds a submission from persisted state.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionValidationError` if required persisted fields are
    /// blank.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: SubmissionId,
        training_id: TrainingId,
        training_name: String,
        first_name: String,
        last_name: String,
        dni: String,
        company: String,
        signature: String,
        submitted_at: DateTime<Utc>,
        email: Option<String>,
        phone: Option<String>,
    ) -> Result<Self, SubmissionValidationError> {
        let draft = SubmissionDraft {
            first_name,
            last_name,
            dni,
            company,
            signature,
            email,
            phone,
        };
        Self::build(id, training_id, training_name, draft, submitted_at)
    }

    fn build(
        id: SubmissionId,
        training_id: TrainingId,
        training_name: String,
        draft: SubmissionDraft,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, SubmissionValidationError> {
        draft.validate()?;

        let signature =
            SignatureImage::new(draft.signature).ok_or(SubmissionValidationError {
                missing: vec![SubmissionField::Signature],
            })?;

        Ok(Self {
            id,
            training_id,
            training_name: training_name.trim().to_owned(),
            first_name: draft.first_name.trim().to_owned(),
            last_name: draft.last_name.trim().to_owned(),
            dni: draft.dni.trim().to_owned(),
            company: draft.company.trim().to_owned(),
            signature,
            submitted_at,
            email: normalize_optional(draft.email),
            phone: normalize_optional(draft.phone),
        })
    }

    #[must_use]
    pub fn id(&self) -> &SubmissionId {
        &self.id
    }

    #[must_use]
    pub fn training_id(&self) -> &TrainingId {
        &self.training_id
    }

    /// The training's name as it read at submission time.
    #[must_use]
    pub fn training_name(&self) -> &str {
        &self.training_name
    }

    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    #[must_use]
    pub fn dni(&self) -> &str {
        &self.dni
    }

    #[must_use]
    pub fn company(&self) -> &str {
        &self.company
    }

    #[must_use]
    pub fn signature(&self) -> &SignatureImage {
        &self.signature
    }

    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
