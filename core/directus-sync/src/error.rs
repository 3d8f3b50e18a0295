//! Error types for the reconciliation layer.

use directus_client::ClientError;
use thiserror::Error;

/// Result type for reconciliation operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while reconciling an entity.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Network failure. Never retried.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx response, with the raw body as returned.
    #[error("directus api {status}: {body}")]
    Api { status: u16, body: String },

    /// The entity does not exist remotely.
    #[error("{kind} {id} not found")]
    NotFound { kind: String, id: String },

    /// A raw JSON field failed validation before sending.
    #[error("invalid payload for field {field:?}: {reason}")]
    InvalidPayload { field: String, reason: String },

    /// The response could not be parsed into the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid {kind} id {value:?}")]
    InvalidId { kind: String, value: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

impl SyncError {
    /// Returns true for [`SyncError::NotFound`] and 404 API errors.
    pub fn is_not_found(&self) -> bool {
        match self {
            SyncError::NotFound { .. } => true,
            SyncError::Api { status, .. } => *status == 404,
            _ => false,
        }
    }
}

impl From<ClientError> for SyncError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport(msg) => SyncError::Transport(msg),
            ClientError::Api { status, body } => SyncError::Api { status, body },
            ClientError::Decode(msg) => SyncError::Decode(msg),
            ClientError::Config(msg) => SyncError::Config(msg),
        }
    }
}
