use directus_types::{IdKind, RemoteId};
use serde::{Deserialize, Serialize};

/// Describes one remote collection: where it lives, how its entities are
/// identified, and which attributes the engine manages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSchema {
    /// Local kind name (e.g., "role").
    pub type_name: String,
    /// Collection path segment without the leading slash (e.g., "roles").
    pub collection: String,
    pub id_kind: IdKind,
    /// Singletons are addressed without an ID and can only be patched.
    #[serde(default)]
    pub singleton: bool,
    pub fields: Vec<FieldSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association: Option<AssociationSpec>,
    /// Value of the `fields` query parameter used on canonical reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_fields: Option<String>,
}

impl ResourceSchema {
    /// `/<collection>`, used for creates and singleton reads/patches.
    #[must_use]
    pub fn collection_path(&self) -> String {
        format!("/{}", self.collection)
    }

    /// `/<collection>/<id>`, or the collection path for singletons.
    #[must_use]
    pub fn entity_path(&self, id: &RemoteId) -> String {
        if self.singleton {
            self.collection_path()
        } else {
            format!("/{}/{id}", self.collection)
        }
    }

    /// Entity path including the canonical `fields` query, if any.
    #[must_use]
    pub fn read_path(&self, id: &RemoteId) -> String {
        let path = self.entity_path(id);
        match &self.read_fields {
            Some(fields) => format!("{path}?fields={fields}"),
            None => path,
        }
    }

    /// Entity path restricted to the association's nested ID field.
    #[must_use]
    pub fn association_read_path(&self, id: &RemoteId) -> Option<String> {
        self.association
            .as_ref()
            .map(|a| format!("{}?fields={}", self.entity_path(id), a.read_fields))
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields the engine may send, in declaration order.
    pub fn writable_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.is_writable())
    }

    /// True if `name` is the association field of this kind.
    #[must_use]
    pub fn is_association_field(&self, name: &str) -> bool {
        self.association.as_ref().is_some_and(|a| a.field == name)
    }
}

/// A single attribute of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub access: FieldAccess,
    /// The host must supply this field; the engine does not enforce it.
    #[serde(default)]
    pub required: bool,
}

impl FieldSpec {
    fn simple(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            access: FieldAccess::ReadWrite,
            required: false,
        }
    }

    /// Shorthand for a string field.
    #[must_use]
    pub fn text(name: &str) -> Self {
        Self::simple(name, FieldKind::Text)
    }

    /// Shorthand for an integer field.
    #[must_use]
    pub fn integer(name: &str) -> Self {
        Self::simple(name, FieldKind::Integer)
    }

    /// Shorthand for a boolean field.
    #[must_use]
    pub fn boolean(name: &str) -> Self {
        Self::simple(name, FieldKind::Boolean)
    }

    /// Shorthand for an embedded JSON document carried as text.
    #[must_use]
    pub fn raw_json(name: &str) -> Self {
        Self::simple(name, FieldKind::RawJson)
    }

    /// Shorthand for a list of strings.
    #[must_use]
    pub fn text_list(name: &str) -> Self {
        Self::simple(name, FieldKind::TextList)
    }

    /// Marks the field as decoded but never sent.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.access = FieldAccess::ReadOnly;
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.access == FieldAccess::ReadWrite
    }
}

/// The local type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer,
    Boolean,
    /// JSON text passed through unparsed to the API's JSON column.
    RawJson,
    TextList,
}

impl FieldKind {
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Text => "a string",
            Self::Integer => "an integer",
            Self::Boolean => "a boolean",
            Self::RawJson => "JSON text",
            Self::TextList => "a list of strings",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldAccess {
    #[default]
    ReadWrite,
    ReadOnly,
}

/// A set of references from an owner to another collection, stored in a
/// junction collection and edited through the owner's nested field.
///
/// For roles the wire shape of one junction record is
/// `{"role": <owner>, "policy": {"id": <target>}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationSpec {
    /// Nested field on the owner (e.g., "policies").
    pub field: String,
    /// Junction key pointing back at the owner (e.g., "role").
    pub owner_key: String,
    /// Junction key pointing at the referenced entity (e.g., "policy").
    pub target_key: String,
    /// `fields` query that returns only the referenced IDs.
    pub read_fields: String,
}
