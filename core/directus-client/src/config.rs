use crate::error::{ClientError, ClientResult};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Request timeout used when none (or zero) is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for a Directus instance.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the instance (e.g. `https://cms.example.com`).
    pub base_url: String,
    /// Static access token. Sent as a bearer token when non-empty.
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Permit plain `http://` base URLs.
    #[serde(default)]
    pub insecure_http: bool,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            insecure_http: false,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &if self.token.is_empty() { "" } else { "<redacted>" })
            .field("timeout_secs", &self.timeout_secs)
            .field("insecure_http", &self.insecure_http)
            .finish()
    }
}

impl ClientConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Effective timeout; zero falls back to the default.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        match self.timeout_secs {
            0 => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    /// Validates the base URL and returns it without trailing slashes.
    pub fn normalized_base_url(&self) -> ClientResult<String> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ClientError::Config("base url is required".to_string()));
        }

        let url = Url::parse(trimmed)
            .map_err(|e| ClientError::Config(format!("invalid base url {trimmed:?}: {e}")))?;

        match url.scheme() {
            "https" => {}
            "http" if self.insecure_http => {}
            "http" => {
                return Err(ClientError::Config(
                    "refusing plain http base url; enable insecure_http to allow it".to_string(),
                ));
            }
            other => {
                return Err(ClientError::Config(format!(
                    "unsupported url scheme {other:?}"
                )));
            }
        }

        Ok(trimmed.to_string())
    }
}
