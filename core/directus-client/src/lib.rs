//! Wire client for the Directus REST API.
//!
//! One authenticated request per call, no retries. Non-2xx responses are
//! returned to the caller as-is so it can decide which statuses are benign
//! (a 404 on delete, for example); [`ApiResponse::error_for_status`] turns
//! the rest into [`ClientError::Api`].

mod api;
mod client;
mod config;
mod error;

pub use api::{ApiResponse, Method, RemoteApi};
pub use client::DirectusClient;
pub use config::{ClientConfig, DEFAULT_TIMEOUT_SECS};
pub use error::{ClientError, ClientResult};
