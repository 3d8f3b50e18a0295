//! reqwest-backed [`RemoteApi`] implementation.

use crate::api::{ApiResponse, Method, RemoteApi};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Authenticated client for one Directus instance.
pub struct DirectusClient {
    base_url: String,
    token: String,
    client: Client,
}

impl DirectusClient {
    /// Validates `config` and builds the underlying HTTP client.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let base_url = config.normalized_base_url()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            token: config.token.clone(),
            client,
        })
    }

    /// Base URL with trailing slashes removed.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

#[async_trait]
impl RemoteApi for DirectusClient {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ClientResult<ApiResponse> {
        debug!("{} {}", method, path);

        let mut request = self
            .client
            .request(method.into(), self.url(path))
            .header(CONTENT_TYPE, "application/json");

        if !self.token.is_empty() {
            request = request.bearer_auth(&self.token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("{method} {path} failed: {e}")))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            ClientError::Transport(format!("failed to read {method} {path} response: {e}"))
        })?;

        debug!("{} {} -> {}", method, path, status);
        Ok(ApiResponse { status, body })
    }
}
