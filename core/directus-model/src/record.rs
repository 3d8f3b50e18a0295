use crate::{FieldKind, FieldSpec, ModelError, ModelResult, ResourceSchema};
use directus_types::{canonical_int, RemoteId};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A typed attribute value.
///
/// A field missing from [`Record::attributes`] is unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
    /// Unparsed JSON text.
    RawJson(String),
    TextList(Vec<String>),
}

impl FieldValue {
    /// Empty values are omitted on create and sent as `null` on update.
    ///
    /// Booleans and lists are never empty once set: `false` and `[]` are
    /// meaningful values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Integer(i) => *i == 0,
            Self::RawJson(s) => s.trim().is_empty(),
            Self::Boolean(_) | Self::TextList(_) => false,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Integer(_) => FieldKind::Integer,
            Self::Boolean(_) => FieldKind::Boolean,
            Self::RawJson(_) => FieldKind::RawJson,
            Self::TextList(_) => FieldKind::TextList,
        }
    }

    /// Document form. Raw JSON stays a string so the text round-trips exactly.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(s) | Self::RawJson(s) => Value::from(s.as_str()),
            Self::Integer(i) => Value::from(*i),
            Self::Boolean(b) => Value::from(*b),
            Self::TextList(items) => Value::from(items.clone()),
        }
    }

    /// Strict conversion from a document value. `null` yields `None`.
    ///
    /// Raw JSON fields accept either JSON text or an inline JSON value, which
    /// is captured in compact form.
    pub fn from_json(spec: &FieldSpec, value: &Value) -> ModelResult<Option<Self>> {
        if value.is_null() {
            return Ok(None);
        }
        let wrong = || ModelError::WrongType {
            field: spec.name.clone(),
            expected: spec.kind.describe(),
        };
        let parsed = match spec.kind {
            FieldKind::Text => Self::Text(value.as_str().ok_or_else(wrong)?.to_string()),
            FieldKind::Integer => Self::Integer(canonical_int(value).map_err(|_| wrong())?),
            FieldKind::Boolean => Self::Boolean(value.as_bool().ok_or_else(wrong)?),
            FieldKind::RawJson => match value {
                Value::String(s) => Self::RawJson(s.clone()),
                other => Self::RawJson(other.to_string()),
            },
            FieldKind::TextList => Self::TextList(string_list(value).ok_or_else(wrong)?),
        };
        Ok(Some(parsed))
    }
}

pub(crate) fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

/// Local state of one entity: its remote ID (once assigned), its attributes,
/// and, for kinds with an association, the referenced target IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub id: Option<RemoteId>,
    pub attributes: BTreeMap<String, FieldValue>,
    /// `None` leaves the association untouched; `Some(vec![])` detaches all.
    pub associations: Option<Vec<String>>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<RemoteId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with(mut self, field: &str, value: FieldValue) -> Self {
        self.set(field, value);
        self
    }

    #[must_use]
    pub fn with_associations<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.associations = Some(targets.into_iter().map(Into::into).collect());
        self
    }

    pub fn set(&mut self, field: &str, value: FieldValue) {
        self.attributes.insert(field.to_string(), value);
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.attributes.get(field)
    }

    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        match self.get(field)? {
            FieldValue::Text(s) | FieldValue::RawJson(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_int(&self, field: &str) -> Option<i64> {
        match self.get(field)? {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        match self.get(field)? {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Parses a JSON document (field name → value) against `schema`.
    ///
    /// An optional `"id"` key is decoded with the schema's ID kind. The
    /// association, if the kind has one, is read from its field name.
    pub fn from_document(schema: &ResourceSchema, doc: &Value) -> ModelResult<Self> {
        let object = doc.as_object().ok_or(ModelError::NotAnObject)?;
        let mut record = Self::new();

        for (key, value) in object {
            if key == "id" {
                if !value.is_null() {
                    record.id = Some(schema.id_kind.decode(value)?);
                }
                continue;
            }
            if schema.is_association_field(key) {
                if !value.is_null() {
                    let targets = string_list(value).ok_or_else(|| ModelError::WrongType {
                        field: key.clone(),
                        expected: FieldKind::TextList.describe(),
                    })?;
                    record.associations = Some(targets);
                }
                continue;
            }
            let spec = schema.field(key).ok_or_else(|| ModelError::UnknownField {
                kind: schema.type_name.clone(),
                field: key.clone(),
            })?;
            if let Some(parsed) = FieldValue::from_json(spec, value)? {
                record.attributes.insert(key.clone(), parsed);
            }
        }
        Ok(record)
    }

    /// Inverse of [`Record::from_document`].
    #[must_use]
    pub fn to_document(&self, schema: &ResourceSchema) -> Value {
        let mut out = Map::new();
        if let Some(id) = &self.id {
            out.insert("id".into(), id.to_json());
        }
        for (name, value) in &self.attributes {
            out.insert(name.clone(), value.to_json());
        }
        if let (Some(assoc), Some(targets)) = (&schema.association, &self.associations) {
            out.insert(assoc.field.clone(), Value::from(targets.clone()));
        }
        Value::Object(out)
    }
}
