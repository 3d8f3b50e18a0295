use anyhow::{Context, Result};
use directus_model::{Record, ResourceSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// The host's record of what it manages: one entity document per kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackedState {
    #[serde(default)]
    pub resources: BTreeMap<String, Value>,
}

impl TrackedState {
    /// Loads the state file. A missing file is an empty state.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read state file {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse state file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self).context("Failed to serialize state")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write state file {}", path.display()))
    }

    /// Returns the tracked record for `schema`'s kind, if any.
    pub fn get(&self, schema: &ResourceSchema) -> Result<Option<Record>> {
        self.resources
            .get(&schema.type_name)
            .map(|doc| {
                Record::from_document(schema, doc)
                    .with_context(|| format!("Tracked {} entry is malformed", schema.type_name))
            })
            .transpose()
    }

    pub fn put(&mut self, schema: &ResourceSchema, record: &Record) {
        self.resources
            .insert(schema.type_name.clone(), record.to_document(schema));
    }

    /// Stops tracking the kind. Returns whether anything was tracked.
    pub fn remove(&mut self, schema: &ResourceSchema) -> bool {
        self.resources.remove(&schema.type_name).is_some()
    }
}

/// Reads a desired-state document (field name → value) for `schema`.
pub fn load_desired(schema: &ResourceSchema, path: &Path) -> Result<Record> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read desired state {}", path.display()))?;
    let doc: Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("Desired state {} is not valid JSON", path.display()))?;
    Record::from_document(schema, &doc)
        .with_context(|| format!("Desired state {} does not match {}", path.display(), schema.type_name))
}
