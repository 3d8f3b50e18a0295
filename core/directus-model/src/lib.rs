//! Resource model for the Directus reconciliation engine.
//!
//! Defines the types the codec and synchronizer are driven by:
//! - [`ResourceSchema`]: a collection's path, ID kind, fields and optional association
//! - [`FieldSpec`] / [`FieldKind`]: one writable or read-only attribute
//! - [`AssociationSpec`]: a junction-backed set of references to another collection
//! - [`Record`] / [`FieldValue`]: typed local state for one entity
//! - [`kinds`]: the built-in role, policy, permission, setting and file kinds

pub mod kinds;
mod record;
mod schema;

pub use record::{FieldValue, Record};
pub use schema::{AssociationSpec, FieldAccess, FieldKind, FieldSpec, ResourceSchema};

/// Result type alias for document conversion.
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// Errors raised when converting a JSON document into a [`Record`].
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("unknown field {field:?} for {kind}")]
    UnknownField { kind: String, field: String },

    #[error("field {field:?} expects {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error("document must be a JSON object")]
    NotAnObject,

    #[error(transparent)]
    Id(#[from] directus_types::Error),
}
