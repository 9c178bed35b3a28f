use crate::model::normalize_optional;
use crate::model::submission::SignatureImage;

/// The administrator's identity block, stamped onto rendered attendance
/// records. Single copy per document, last write wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdminConfig {
    signature: Option<SignatureImage>,
    clarification: Option<String>,
    job_title: Option<String>,
}

/// Editable admin configuration, as collected by the settings form.
#[derive(Clone, Debug, Default)]
pub struct AdminConfigDraft {
    pub signature: Option<String>,
    pub clarification: Option<String>,
    pub job_title: Option<String>,
}

impl AdminConfigDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes the draft into persisted configuration; blank fields
    /// become absent.
    #[must_use]
    pub fn normalize(self) -> AdminConfig {
        AdminConfig {
            signature: self.signature.and_then(SignatureImage::new),
            clarification: normalize_optional(self.clarification),
            job_title: normalize_optional(self.job_title),
        }
    }
}

impl AdminConfig {
    #[must_use]
    pub fn from_persisted(
        signature: Option<String>,
        clarification: Option<String>,
        job_title: Option<String>,
    ) -> Self {
        AdminConfigDraft {
            signature,
            clarification,
            job_title,
        }
        .normalize()
    }

    #[must_use]
    pub fn signature(&self) -> Option<&SignatureImage> {
        self.signature.as_ref()
    }

    /// Display name printed under the admin's signature.
    #[must_use]
    pub fn clarification(&self) -> Option<&str> {
        self.clarification.as_deref()
    }

    #[must_use]
    pub fn job_title(&self) -> Option<&str> {
        self.job_title.as_deref()
    }
}
