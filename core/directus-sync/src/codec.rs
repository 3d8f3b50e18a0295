//! Attribute codec mapping typed records to and from the API's loose JSON.
//!
//! Encoding depends on [`EncodeMode`]:
//! - `Create` sends only non-empty writable fields, so remote defaults apply.
//! - `Update` sends every writable field; empty or unset values go out as
//!   explicit `null` so clearing a field locally clears it remotely.
//!
//! Decoding is defensive: a value whose wire type does not match the field
//! kind decodes as unset instead of failing the whole read.

use crate::error::{SyncError, SyncResult};
use directus_model::{AssociationSpec, FieldKind, FieldValue, Record, ResourceSchema};
use directus_types::Scalar;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Which encoding rules to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeMode {
    Create,
    Update,
}

/// Encodes the scalar attributes of `record`. Associations are not included.
pub fn encode(
    schema: &ResourceSchema,
    record: &Record,
    mode: EncodeMode,
) -> SyncResult<Map<String, Value>> {
    let mut out = Map::new();
    for spec in schema.writable_fields() {
        match (record.get(&spec.name), mode) {
            (Some(value), _) if !value.is_empty() => {
                out.insert(spec.name.clone(), to_wire(&spec.name, value)?);
            }
            (_, EncodeMode::Update) => {
                out.insert(spec.name.clone(), Value::Null);
            }
            (_, EncodeMode::Create) => {}
        }
    }
    Ok(out)
}

fn to_wire(field: &str, value: &FieldValue) -> SyncResult<Value> {
    Ok(match value {
        FieldValue::Text(s) => Value::from(s.as_str()),
        FieldValue::Integer(i) => Value::from(*i),
        FieldValue::Boolean(b) => Value::from(*b),
        FieldValue::TextList(items) => Value::from(items.clone()),
        FieldValue::RawJson(text) => parse_raw_json(field, text)?,
    })
}

/// Validates embedded JSON text and returns it as a JSON value, so it is sent
/// as structure rather than as a quoted string. Blank text maps to `null`.
pub fn parse_raw_json(field: &str, text: &str) -> SyncResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| SyncError::InvalidPayload {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

/// Decodes an entity from the `data` member of a response.
///
/// Non-singleton kinds require an `id`; singletons take it when present.
/// The association is decoded only if its field appears in `data`.
pub fn decode(schema: &ResourceSchema, data: &Map<String, Value>) -> SyncResult<Record> {
    let mut record = Record::new();

    match data.get("id") {
        Some(raw) if !raw.is_null() => {
            let id = schema
                .id_kind
                .decode(raw)
                .map_err(|e| SyncError::Decode(format!("{} id: {e}", schema.type_name)))?;
            record.id = Some(id);
        }
        _ if schema.singleton => {}
        _ => {
            return Err(SyncError::Decode(format!(
                "{} response has no id",
                schema.type_name
            )));
        }
    }

    for spec in &schema.fields {
        let raw = data.get(&spec.name).unwrap_or(&Value::Null);
        if let Some(value) = from_wire(spec.kind, raw) {
            record.attributes.insert(spec.name.clone(), value);
        }
    }

    if let Some(assoc) = &schema.association {
        if let Some(raw) = data.get(&assoc.field) {
            record.associations = Some(observed_targets(assoc, raw));
        }
    }

    Ok(record)
}

fn from_wire(kind: FieldKind, raw: &Value) -> Option<FieldValue> {
    let scalar = Scalar::classify(raw);
    match kind {
        FieldKind::Text => scalar.as_str().map(|s| FieldValue::Text(s.to_string())),
        FieldKind::Integer => scalar.as_int().map(FieldValue::Integer),
        FieldKind::Boolean => scalar.as_bool().map(FieldValue::Boolean),
        FieldKind::RawJson if scalar.is_null() => None,
        FieldKind::RawJson => Some(FieldValue::RawJson(raw.to_string())),
        FieldKind::TextList => raw
            .as_array()?
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(FieldValue::TextList),
    }
}

/// Extracts referenced target IDs from an observed association field.
///
/// Junction entries may carry the target expanded (`{"policy": {"id": "p"}}`)
/// or collapsed (`{"policy": "p"}`). Entries of any other shape are skipped,
/// and repeated targets keep their first position.
#[must_use]
pub fn observed_targets(spec: &AssociationSpec, raw: &Value) -> Vec<String> {
    let Some(entries) = raw.as_array() else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    entries
        .iter()
        .filter_map(|entry| target_id(entry.get(&spec.target_key)?))
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

fn target_id(value: &Value) -> Option<String> {
    let id = match value {
        Value::Object(map) => map.get("id")?,
        other => other,
    };
    match id {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
