//! Core type definitions for the Directus reconciliation engine.
//!
//! This crate defines the plugin-agnostic types shared by every layer:
//! - Remote entity identifiers (text or integer, decided by the API per collection)
//! - The tagged wire scalar used to classify loosely-typed JSON attribute values
//! - Canonical integer decoding for numeric identifiers and counters
//!
//! Resource schemas and typed records live in `directus-model`.

mod ids;
mod scalar;

pub use ids::{canonical_int, IdKind, RemoteId};
pub use scalar::Scalar;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding identifiers and numbers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no numeric interpretation for value: {0}")]
    NotNumeric(String),

    #[error("invalid {kind} identifier: {value:?}")]
    InvalidId { kind: IdKind, value: String },
}
