use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

use crate::model::ids::{LinkId, TrainingId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TrainingError {
    #[error("training name cannot be empty")]
    EmptyName,

    #[error("link {0} has an invalid URL")]
    InvalidLinkUrl(LinkId),

    #[error("duplicate link id {0} within training")]
    DuplicateLinkId(LinkId),
}

//
// ─── SHARE KEY ─────────────────────────────────────────────────────────────────
//

/// Opaque permanent token through which outsiders discover one Training.
///
/// Set once on a training and immutable afterwards.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShareKey(String);

impl ShareKey {
    /// Wraps an existing opaque key value.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Derives a new key from the training id and a clock reading.
    ///
    /// The key embeds both the id and the microsecond timestamp, so keys
    /// minted within one document at increasing clock readings never collide.
    #[must_use]
    pub fn mint(training_id: &TrainingId, at: DateTime<Utc>) -> Self {
        Self(format!("{}-{:x}", training_id.as_str(), at.timestamp_micros()))
    }

    /// Returns the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ShareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShareKey({})", self.0)
    }
}

impl fmt::Display for ShareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── LINK ──────────────────────────────────────────────────────────────────────
//

/// A single study link inside a training.
///
/// Immutable once created; admin edits replace the whole Training.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    id: LinkId,
    name: Option<String>,
    url: String,
}

impl Link {
    /// Creates a new link.
    ///
    /// # Errors
    ///
    /// Returns `TrainingError::InvalidLinkUrl` if `url` does not parse as an
    /// absolute URL.
    pub fn new(
        id: LinkId,
        name: Option<String>,
        url: impl Into<String>,
    ) -> Result<Self, TrainingError> {
        let url = url.into();
        if Url::parse(&url).is_err() {
            return Err(TrainingError::InvalidLinkUrl(id));
        }

        let name = name.map(|n| n.trim().to_owned()).filter(|n| !n.is_empty());

        Ok(Self { id, name, url })
    }

    #[must_use]
    pub fn id(&self) -> &LinkId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

//
// ─── TRAINING ──────────────────────────────────────────────────────────────────
//

/// An ordered set of study links published by the administrator.
///
/// A training becomes discoverable by outsiders only once a share key has
/// been assigned to it. The optional company list suggests eligible
/// submitters; an empty list means unrestricted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Training {
    id: TrainingId,
    name: String,
    links: Vec<Link>,
    share_key: Option<ShareKey>,
    companies: Vec<String>,
}

impl Training {
    /// Creates a new training without a share key.
    ///
    /// # Errors
    ///
    /// Returns `TrainingError::EmptyName` if the name is blank, or
    /// `TrainingError::DuplicateLinkId` if two links share an id.
    pub fn new(
        id: TrainingId,
        name: impl Into<String>,
        links: Vec<Link>,
        companies: Vec<String>,
    ) -> Result<Self, TrainingError> {
        Self::from_persisted(id, name, links, None, companies)
    }

    /// Rebuilds a training from persisted state, including its share key.
    ///
    /// # Errors
    ///
    /// Same validation as [`Training::new`].
    pub fn from_persisted(
        id: TrainingId,
        name: impl Into<String>,
        links: Vec<Link>,
        share_key: Option<ShareKey>,
        companies: Vec<String>,
    ) -> Result<Self, TrainingError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TrainingError::EmptyName);
        }

        for (i, link) in links.iter().enumerate() {
            if links[..i].iter().any(|other| other.id() == link.id()) {
                return Err(TrainingError::DuplicateLinkId(link.id().clone()));
            }
        }

        let companies = companies
            .into_iter()
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty())
            .collect();

        Ok(Self {
            id,
            name: name.trim().to_owned(),
            links,
            share_key,
            companies,
        })
    }

    #[must_use]
    pub fn id(&self) -> &TrainingId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    #[must_use]
    pub fn share_key(&self) -> Option<&ShareKey> {
        self.share_key.as_ref()
    }

    #[must_use]
    pub fn companies(&self) -> &[String] {
        &self.companies
    }

    /// True when a link with `id` exists in this training.
    #[must_use]
    pub fn has_link(&self, id: &LinkId) -> bool {
        self.links.iter().any(|l| l.id() == id)
    }

    // Share keys are set once and only through Document, which also enforces
    // document-wide key uniqueness.
    pub(crate) fn set_share_key(&mut self, key: ShareKey) {
        self.share_key = Some(key);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
