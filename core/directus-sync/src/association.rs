//! Association differ.
//!
//! An association is identified by its `(owner, target)` pair. Given the
//! desired and observed target lists for one owner, [`diff`] returns which
//! pairs to create and which to delete so that
//! `(observed \ to_delete) ∪ to_create == desired`.

use directus_model::AssociationSpec;
use directus_types::RemoteId;
use serde_json::{json, Value};
use std::collections::HashSet;

/// A directed link from an owner entity to a referenced entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Association {
    pub owner: RemoteId,
    pub target: String,
}

impl Association {
    #[must_use]
    pub fn new(owner: RemoteId, target: impl Into<String>) -> Self {
        Self {
            owner,
            target: target.into(),
        }
    }

    /// Junction record: `{"<owner_key>": owner, "<target_key>": {"id": target}}`.
    fn to_junction(&self, spec: &AssociationSpec) -> Value {
        let mut entry = serde_json::Map::new();
        entry.insert(spec.owner_key.clone(), self.owner.to_json());
        entry.insert(spec.target_key.clone(), json!({ "id": self.target }));
        Value::Object(entry)
    }
}

/// Ordered batches of associations to create and delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationDiff {
    /// In desired order.
    pub to_create: Vec<Association>,
    /// In observed order.
    pub to_delete: Vec<Association>,
}

impl AssociationDiff {
    /// An empty diff means the mutating request is skipped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty()
    }

    /// Builds the single batched PATCH body for the owner's nested field.
    /// The `update` list is always empty.
    #[must_use]
    pub fn to_patch(&self, spec: &AssociationSpec) -> Value {
        let create: Vec<Value> = self.to_create.iter().map(|a| a.to_junction(spec)).collect();
        let delete: Vec<Value> = self.to_delete.iter().map(|a| a.to_junction(spec)).collect();
        let mut body = serde_json::Map::new();
        body.insert(
            spec.field.clone(),
            json!({ "create": create, "update": [], "delete": delete }),
        );
        Value::Object(body)
    }
}

/// Computes the association batches for `owner`.
///
/// Does not deduplicate `desired`; callers pass a deduplicated list (see
/// [`dedup_targets`]). Referenced entities are never deleted, only detached.
#[must_use]
pub fn diff(owner: &RemoteId, desired: &[String], observed: &[String]) -> AssociationDiff {
    let observed_set: HashSet<&str> = observed.iter().map(String::as_str).collect();
    let to_create = desired
        .iter()
        .filter(|id| !observed_set.contains(id.as_str()))
        .map(|id| Association::new(owner.clone(), id.as_str()))
        .collect();

    let desired_set: HashSet<&str> = desired.iter().map(String::as_str).collect();
    let to_delete = observed
        .iter()
        .filter(|id| !desired_set.contains(id.as_str()))
        .map(|id| Association::new(owner.clone(), id.as_str()))
        .collect();

    AssociationDiff {
        to_create,
        to_delete,
    }
}

/// Removes repeated targets, keeping the first occurrence of each.
#[must_use]
pub fn dedup_targets(targets: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    targets
        .iter()
        .filter(|t| seen.insert(t.as_str()))
        .cloned()
        .collect()
}
