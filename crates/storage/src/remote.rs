use std::env;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::backend::{DocumentBackend, StoreError};

/// Credential header attached to every request against the remote store.
const CREDENTIAL_HEADER: &str = "X-Master-Key";

/// Values that mean "nobody provisioned this yet".
const PLACEHOLDER_CREDENTIALS: [&str; 3] = ["REPLACE_ME", "changeme", "TODO"];

/// Connection settings for the remote document endpoint.
#[derive(Clone, Debug)]
pub struct RemoteConfig {
    pub base_url: String,
    pub bin_id: String,
    pub api_key: String,
}

impl RemoteConfig {
    /// Reads the configuration from the environment.
    ///
    /// Returns `None` when no bin id is set at all; placeholder values are
    /// kept so the store can fail with a configuration error instead of
    /// silently doing nothing.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let bin_id = env::var("ATTEST_STORE_BIN").ok()?;
        let base_url = env::var("ATTEST_STORE_URL")
            .unwrap_or_else(|_| "https://api.jsonbin.io/v3".into());
        let api_key = env::var("ATTEST_STORE_KEY").unwrap_or_default();
        Some(Self {
            base_url,
            bin_id,
            api_key,
        })
    }

    /// Checks that the store is provisioned.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` when the bin id or credential is blank
    /// or still a placeholder.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.bin_id.trim().is_empty() || is_placeholder(&self.bin_id) {
            return Err(StoreError::Config("bin id is not set".into()));
        }
        if self.api_key.trim().is_empty() || is_placeholder(&self.api_key) {
            return Err(StoreError::Config("credential is not set".into()));
        }
        Ok(())
    }

    fn latest_url(&self) -> String {
        format!(
            "{}/b/{}/latest",
            self.base_url.trim_end_matches('/'),
            self.bin_id
        )
    }

    fn replace_url(&self) -> String {
        format!("{}/b/{}", self.base_url.trim_end_matches('/'), self.bin_id)
    }
}

fn is_placeholder(value: &str) -> bool {
    PLACEHOLDER_CREDENTIALS
        .iter()
        .any(|p| value.trim().eq_ignore_ascii_case(p))
}

/// Backend speaking to the remote blob endpoint.
///
/// `GET {base}/b/{bin}/latest` returns `{ "record": <document> }`; the
/// envelope is stripped here. `PUT {base}/b/{bin}` replaces the whole
/// document with the request body. Both carry the credential header.
#[derive(Clone)]
pub struct RemoteBackend {
    client: Client,
    config: RemoteConfig,
}

impl RemoteBackend {
    #[must_use]
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Builds a backend from the environment, if a bin id is configured.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        RemoteConfig::from_env().map(Self::new)
    }

    fn check_status(status: StatusCode) -> Result<(), StoreError> {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::Auth(status));
        }
        if !status.is_success() {
            return Err(StoreError::Network(format!(
                "unexpected status {status}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentBackend for RemoteBackend {
    async fn load(&self) -> Result<Value, StoreError> {
        self.config.validate()?;

        let response = self
            .client
            .get(self.config.latest_url())
            .header(CREDENTIAL_HEADER, &self.config.api_key)
            .send()
            .await?;
        Self::check_status(response.status())?;

        let body: Value = response.json().await?;
        body.get("record")
            .cloned()
            .ok_or_else(|| StoreError::Serialization("response missing record envelope".into()))
    }

    async fn store(&self, document: &Value) -> Result<(), StoreError> {
        self.config.validate()?;

        let response = self
            .client
            .put(self.config.replace_url())
            .header(CREDENTIAL_HEADER, &self.config.api_key)
            .json(document)
            .send()
            .await?;
        Self::check_status(response.status())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(bin: &str, key: &str) -> RemoteConfig {
        RemoteConfig {
            base_url: "https://api.jsonbin.io/v3".into(),
            bin_id: bin.into(),
            api_key: key.into(),
        }
    }

    #[test]
    fn validate_rejects_blank_and_placeholder_credentials() {
        assert!(matches!(
            config("bin-1", "").validate(),
            Err(StoreError::Config(_))
        ));
        assert!(matches!(
            config("bin-1", "REPLACE_ME").validate(),
            Err(StoreError::Config(_))
        ));
        assert!(matches!(
            config("", "secret").validate(),
            Err(StoreError::Config(_))
        ));
        assert!(config("bin-1", "secret").validate().is_ok());
    }

    #[test]
    fn urls_trim_trailing_slash() {
        let mut cfg = config("bin-1", "secret");
        cfg.base_url = "https://api.jsonbin.io/v3/".into();
        assert_eq!(cfg.latest_url(), "https://api.jsonbin.io/v3/b/bin-1/latest");
        assert_eq!(cfg.replace_url(), "https://api.jsonbin.io/v3/b/bin-1");
    }
}
