use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use attest_core::Error;
use attest_core::model::{
    AdminConfig, Document, Link, LinkId, ShareKey, Submission, SubmissionId, Training, TrainingId,
};

/// Persisted shape of the whole document.
///
/// Mirrors the domain `Document` so the store can serialize to and from the
/// remote wire format without leaking storage concerns into the domain
/// layer. Container-level `#[serde(default)]` back-fills any top-level field
/// a stored document omits, so consumers never see absent containers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentRecord {
    pub submissions: Vec<SubmissionRecord>,
    pub trainings: Vec<TrainingRecord>,
    pub companies: Vec<String>,
    pub admin_config: Option<AdminConfigRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRecord {
    pub id: TrainingId,
    pub name: String,
    #[serde(default)]
    pub links: Vec<LinkRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_key: Option<ShareKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub companies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    pub id: LinkId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub training_id: TrainingId,
    pub training_name: String,
    pub first_name: String,
    pub last_name: String,
    pub dni: String,
    pub company: String,
    pub signature: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminConfigRecord {
    pub signature: Option<String>,
    pub clarification: Option<String>,
    pub job_title: Option<String>,
}

impl DocumentRecord {
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        Self {
            submissions: document
                .submissions()
                .iter()
                .map(SubmissionRecord::from_submission)
                .collect(),
            trainings: document
                .trainings()
                .iter()
                .map(TrainingRecord::from_training)
                .collect(),
            companies: document.companies().to_vec(),
            admin_config: Some(AdminConfigRecord::from_config(document.admin_config())),
        }
    }

    /// Convert the record back into a domain `Document`.
    ///
    /// # Errors
    ///
    /// Returns `attest_core::Error` if any stored entity fails domain
    /// validation or a document-wide invariant is violated.
    pub fn into_document(self) -> Result<Document, Error> {
        let trainings = self
            .trainings
            .into_iter()
            .map(TrainingRecord::into_training)
            .collect::<Result<Vec<_>, _>>()?;

        let submissions = self
            .submissions
            .into_iter()
            .map(SubmissionRecord::into_submission)
            .collect::<Result<Vec<_>, _>>()?;

        let admin_config = self
            .admin_config
            .map_or_else(AdminConfig::default, AdminConfigRecord::into_config);

        Ok(Document::from_parts(
            submissions,
            trainings,
            self.companies,
            admin_config,
        )?)
    }
}

impl TrainingRecord {
    #[must_use]
    pub fn from_training(training: &Training) -> Self {
        Self {
            id: training.id().clone(),
            name: training.name().to_owned(),
            links: training.links().iter().map(LinkRecord::from_link).collect(),
            share_key: training.share_key().cloned(),
            companies: training.companies().to_vec(),
        }
    }

    /// # Errors
    ///
    /// Returns `attest_core::Error` if the stored training fails validation.
    pub fn into_training(self) -> Result<Training, Error> {
        let links = self
            .links
            .into_iter()
            .map(LinkRecord::into_link)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Training::from_persisted(
            self.id,
            self.name,
            links,
            self.share_key,
            self.companies,
        )?)
    }
}

impl LinkRecord {
    #[must_use]
    pub fn from_link(link: &Link) -> Self {
        Self {
            id: link.id().clone(),
            name: link.name().map(str::to_owned),
            url: link.url().to_owned(),
        }
    }

    /// # Errors
    ///
    /// Returns `attest_core::Error` if the stored URL is invalid.
    pub fn into_link(self) -> Result<Link, Error> {
        Ok(Link::new(self.id, self.name, self.url)?)
    }
}

impl SubmissionRecord {
    #[must_use]
    pub fn from_submission(submission: &Submission) -> Self {
        Self {
            id: submission.id().clone(),
            training_id: submission.training_id().clone(),
            training_name: submission.training_name().to_owned(),
            first_name: submission.first_name().to_owned(),
            last_name: submission.last_name().to_owned(),
            dni: submission.dni().to_owned(),
            company: submission.company().to_owned(),
            signature: submission.signature().as_str().to_owned(),
            timestamp: submission.submitted_at(),
            email: submission.email().map(str::to_owned),
            phone: submission.phone().map(str::to_owned),
        }
    }

    /// # Errors
    ///
    /// Returns `attest_core::Error` if required persisted fields are blank.
    pub fn into_submission(self) -> Result<Submission, Error> {
        Ok(Submission::from_persisted(
            self.id,
            self.training_id,
            self.training_name,
            self.first_name,
            self.last_name,
            self.dni,
            self.company,
            self.signature,
            self.timestamp,
            self.email,
            self.phone,
        )?)
    }
}

impl AdminConfigRecord {
    #[must_use]
    pub fn from_config(config: &AdminConfig) -> Self {
        Self {
            signature: config.signature().map(|s| s.as_str().to_owned()),
            clarification: config.clarification().map(str::to_owned),
            job_title: config.job_title().map(str::to_owned),
        }
    }

    #[must_use]
    pub fn into_config(self) -> AdminConfig {
        AdminConfig::from_persisted(self.signature, self.clarification, self.job_title)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use attest_core::model::SubmissionDraft;
    use attest_core::time::fixed_now;
    use serde_json::json;

    fn sample_document() -> Document {
        let training = Training::new(
            TrainingId::new("t1"),
            "Safety 101",
            vec![
                Link::new(
                    LinkId::new("l1"),
                    Some("Intro".into()),
                    "https://example.com/intro",
                )
                .unwrap(),
                Link::new(LinkId::new("l2"), None, "https://example.com/video").unwrap(),
            ],
            vec!["Acme".into()],
        )
        .unwrap();

        let draft = SubmissionDraft {
            first_name: "Ana".into(),
            last_name: "García".into(),
            dni: "12345678Z".into(),
            company: "Acme".into(),
            signature: "data:image/png;base64,AAAA".into(),
            email: Some("ana@example.com".into()),
            phone: None,
        };
        let submission =
            Submission::from_draft(SubmissionId::new("s1"), &training, draft, fixed_now())
                .unwrap();

        let mut document = Document::new();
        document.upsert_training(training).unwrap();
        document.push_submission(submission).unwrap();
        document.add_company("Acme");
        document
    }

    #[test]
    fn empty_value_back_fills_every_field() {
        let record: DocumentRecord = serde_json::from_value(json!({})).unwrap();
        let document = record.into_document().unwrap();

        assert!(document.submissions().is_empty());
        assert!(document.trainings().is_empty());
        assert!(document.companies().is_empty());
        assert_eq!(document.admin_config(), &AdminConfig::default());
    }

    #[test]
    fn partial_value_back_fills_only_missing_fields() {
        let record: DocumentRecord = serde_json::from_value(json!({
            "trainings": [
                { "id": "t1", "name": "Safety 101" }
            ]
        }))
        .unwrap();
        let document = record.into_document().unwrap();

        assert_eq!(document.trainings().len(), 1);
        assert!(document.trainings()[0].links().is_empty());
        assert!(document.submissions().is_empty());
    }

    #[test]
    fn wire_format_uses_camel_case() {
        let record = DocumentRecord::from_document(&sample_document());
        let value = serde_json::to_value(&record).unwrap();

        let submission = &value["submissions"][0];
        assert_eq!(submission["trainingId"], "t1");
        assert_eq!(submission["trainingName"], "Safety 101");
        assert_eq!(submission["firstName"], "Ana");
        assert!(submission.get("phone").is_none());
        assert!(value["adminConfig"].is_object());
        // No share key assigned, so the field stays off the wire.
        assert!(value["trainings"][0].get("shareKey").is_none());
    }

    #[test]
    fn document_round_trips_through_the_record() {
        let document = sample_document();
        let record = DocumentRecord::from_document(&document);
        let value = serde_json::to_value(&record).unwrap();
        let decoded: DocumentRecord = serde_json::from_value(value).unwrap();

        assert_eq!(decoded.into_document().unwrap(), document);
    }

    #[test]
    fn invalid_stored_training_fails_decoding() {
        let record: DocumentRecord = serde_json::from_value(json!({
            "trainings": [
                { "id": "t1", "name": "   " }
            ]
        }))
        .unwrap();
        assert!(record.into_document().is_err());
    }
}
