//! Abstract seam between the synchronizer and the HTTP transport.

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;

/// The HTTP verbs the Directus item endpoints use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        })
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Status and raw body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Converts any non-2xx response into [`ClientError::Api`].
    pub fn error_for_status(self) -> ClientResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::Api {
                status: self.status,
                body: self.body,
            })
        }
    }

    /// Extracts the `data` member of a `{"data": ...}` envelope.
    pub fn data(&self) -> ClientResult<Value> {
        let envelope: Value = serde_json::from_str(&self.body)
            .map_err(|e| ClientError::Decode(format!("invalid JSON body: {e}")))?;
        match envelope {
            Value::Object(mut map) => map
                .remove("data")
                .ok_or_else(|| ClientError::Decode("response has no data member".to_string())),
            _ => Err(ClientError::Decode(
                "response body is not a JSON object".to_string(),
            )),
        }
    }

    /// Like [`ApiResponse::data`], but requires the payload to be an object.
    pub fn data_object(&self) -> ClientResult<Map<String, Value>> {
        match self.data()? {
            Value::Object(map) => Ok(map),
            other => Err(ClientError::Decode(format!(
                "expected data to be an object, got {other}"
            ))),
        }
    }
}

/// A transport able to issue one authenticated request against the API.
///
/// `path` is relative to the configured base URL and may carry a query
/// string. Implementations return non-2xx responses rather than failing, and
/// reserve errors for transport-level problems.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ClientResult<ApiResponse>;

    async fn get(&self, path: &str) -> ClientResult<ApiResponse> {
        self.request(Method::Get, path, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> ClientResult<ApiResponse> {
        self.request(Method::Post, path, Some(body)).await
    }

    async fn patch(&self, path: &str, body: &Value) -> ClientResult<ApiResponse> {
        self.request(Method::Patch, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> ClientResult<ApiResponse> {
        self.request(Method::Delete, path, None).await
    }
}
