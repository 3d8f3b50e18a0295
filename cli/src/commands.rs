use crate::tracked::TrackedState;
use anyhow::{Context, Result};
use directus_model::{Record, ResourceSchema};
use directus_sync::{ReadOutcome, ResourceLifecycle};
use tracing::info;

fn tracked_id(schema: &ResourceSchema, record: &Record) -> Result<directus_types::RemoteId> {
    record
        .id
        .clone()
        .with_context(|| format!("Tracked {} entry has no id", schema.type_name))
}

/// Creates the entity if nothing is tracked for the kind, otherwise updates
/// it. The refreshed record replaces the tracked entry.
pub async fn apply(
    lifecycle: &dyn ResourceLifecycle,
    schema: &ResourceSchema,
    state: &mut TrackedState,
    desired: &Record,
) -> Result<Record> {
    let record = match state.get(schema)? {
        Some(tracked) => {
            let id = tracked_id(schema, &tracked)?;
            lifecycle
                .update(&id, desired)
                .await
                .with_context(|| format!("Failed to update {} {}", schema.type_name, id))?
        }
        None => lifecycle
            .create(desired)
            .await
            .with_context(|| format!("Failed to create {}", schema.type_name))?,
    };
    state.put(schema, &record);
    Ok(record)
}

/// Re-reads the tracked entity. Returns `None` (and stops tracking) if it
/// was removed remotely.
pub async fn refresh(
    lifecycle: &dyn ResourceLifecycle,
    schema: &ResourceSchema,
    state: &mut TrackedState,
) -> Result<Option<Record>> {
    let tracked = state
        .get(schema)?
        .with_context(|| format!("Nothing tracked for {}", schema.type_name))?;
    let id = tracked_id(schema, &tracked)?;

    let outcome = lifecycle
        .read(&id)
        .await
        .with_context(|| format!("Failed to read {} {}", schema.type_name, id))?;
    match outcome {
        ReadOutcome::Present(record) => {
            state.put(schema, &record);
            Ok(Some(record))
        }
        ReadOutcome::Gone => {
            state.remove(schema);
            info!("Stopped tracking {} {}", schema.type_name, id);
            Ok(None)
        }
    }
}

/// Deletes the tracked entity (detaching singletons) and stops tracking it.
/// Returns false if nothing was tracked.
pub async fn destroy(
    lifecycle: &dyn ResourceLifecycle,
    schema: &ResourceSchema,
    state: &mut TrackedState,
) -> Result<bool> {
    let Some(tracked) = state.get(schema)? else {
        return Ok(false);
    };
    let id = tracked_id(schema, &tracked)?;
    lifecycle
        .delete(&id)
        .await
        .with_context(|| format!("Failed to delete {} {}", schema.type_name, id))?;
    state.remove(schema);
    Ok(true)
}

/// Adopts an existing remote entity and starts tracking it.
pub async fn import(
    lifecycle: &dyn ResourceLifecycle,
    schema: &ResourceSchema,
    state: &mut TrackedState,
    raw_id: &str,
) -> Result<Record> {
    let record = lifecycle
        .import(raw_id)
        .await
        .with_context(|| format!("Failed to import {} {}", schema.type_name, raw_id))?;
    state.put(schema, &record);
    Ok(record)
}
