//! Entity synchronizer. Drives one resource kind against the wire client.
//!
//! Every mutation is followed by a canonical re-read, so the returned record
//! always reflects what the API stored rather than what was sent.

use crate::association::{self, dedup_targets};
use crate::codec::{self, EncodeMode};
use crate::error::{SyncError, SyncResult};
use crate::lifecycle::{ReadOutcome, ResourceLifecycle};
use crate::state::{EntityPhase, PhaseTracker};
use async_trait::async_trait;
use directus_client::{ApiResponse, Method, RemoteApi};
use directus_model::{AssociationSpec, Record, ResourceSchema};
use directus_types::RemoteId;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reconciles entities of one [`ResourceSchema`].
pub struct EntitySynchronizer {
    api: Arc<dyn RemoteApi>,
    schema: ResourceSchema,
}

impl EntitySynchronizer {
    pub fn new(api: Arc<dyn RemoteApi>, schema: ResourceSchema) -> Self {
        Self { api, schema }
    }

    pub fn schema(&self) -> &ResourceSchema {
        &self.schema
    }

    fn tracker(&self, start: EntityPhase) -> PhaseTracker {
        PhaseTracker::new(&self.schema.type_name, self.schema.singleton, start)
    }

    /// Placeholder identity for singletons whose payload carries no `id`.
    fn singleton_id(&self) -> RemoteId {
        RemoteId::from(self.schema.collection.as_str())
    }

    /// Issues a request and fails on any non-2xx status.
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> SyncResult<ApiResponse> {
        let response = self.api.request(method, path, body).await?;
        Ok(response.error_for_status()?)
    }

    fn decode_record(&self, data: &Map<String, Value>, id: &RemoteId) -> SyncResult<Record> {
        let mut record = codec::decode(&self.schema, data)?;
        if record.id.is_none() {
            record.id = Some(id.clone());
        }
        Ok(record)
    }

    /// Canonical read. A 404 yields `None`.
    async fn fetch(&self, id: &RemoteId) -> SyncResult<Option<Record>> {
        let response = self.api.get(&self.schema.read_path(id)).await?;
        if response.is_not_found() {
            return Ok(None);
        }
        let data = response.error_for_status()?.data_object()?;
        self.decode_record(&data, id).map(Some)
    }

    /// Canonical read after a mutation. A 404 here is an API error.
    async fn refetch(&self, id: &RemoteId) -> SyncResult<Record> {
        let data = self
            .send(Method::Get, &self.schema.read_path(id), None)
            .await?
            .data_object()?;
        self.decode_record(&data, id)
    }

    fn created_id(&self, data: &Map<String, Value>) -> SyncResult<RemoteId> {
        let raw = data
            .get("id")
            .filter(|v| !v.is_null())
            .ok_or_else(|| {
                SyncError::Decode(format!("{} create response has no id", self.schema.type_name))
            })?;
        self.schema
            .id_kind
            .decode(raw)
            .map_err(|e| SyncError::Decode(format!("{} id: {e}", self.schema.type_name)))
    }

    /// Read-before-diff: fetches the current targets, then issues one batched
    /// patch only if anything differs.
    async fn reconcile_associations(
        &self,
        spec: &AssociationSpec,
        id: &RemoteId,
        targets: &[String],
    ) -> SyncResult<()> {
        let desired = dedup_targets(targets);
        let path = format!("{}?fields={}", self.schema.entity_path(id), spec.read_fields);
        let data = self.send(Method::Get, &path, None).await?.data_object()?;
        let observed = data
            .get(&spec.field)
            .map(|raw| codec::observed_targets(spec, raw))
            .unwrap_or_default();

        let batch = association::diff(id, &desired, &observed);
        if batch.is_empty() {
            debug!("{} {} {} unchanged, skipping patch", self.schema.type_name, id, spec.field);
            return Ok(());
        }

        debug!(
            "{} {}: attaching {} and detaching {} {}",
            self.schema.type_name,
            id,
            batch.to_create.len(),
            batch.to_delete.len(),
            spec.field
        );
        self.send(Method::Patch, &self.schema.entity_path(id), Some(&batch.to_patch(spec)))
            .await?;
        Ok(())
    }

    /// Singleton "create": patch with create encoding so unset fields keep
    /// their remote values, then read back.
    async fn create_singleton(&self, desired: &Record) -> SyncResult<Record> {
        let mut phase = self.tracker(EntityPhase::Absent);
        phase.advance(EntityPhase::Updating)?;

        let id = desired.id.clone().unwrap_or_else(|| self.singleton_id());
        let body = Value::Object(codec::encode(&self.schema, desired, EncodeMode::Create)?);
        self.send(Method::Patch, &self.schema.collection_path(), Some(&body))
            .await?;

        let record = self.refetch(&id).await?;
        phase.advance(EntityPhase::Present)?;
        info!("Adopted {} singleton", self.schema.type_name);
        Ok(record)
    }
}

#[async_trait]
impl ResourceLifecycle for EntitySynchronizer {
    fn kind(&self) -> &str {
        &self.schema.type_name
    }

    async fn create(&self, desired: &Record) -> SyncResult<Record> {
        if self.schema.singleton {
            return self.create_singleton(desired).await;
        }

        let mut phase = self.tracker(EntityPhase::Absent);
        phase.advance(EntityPhase::Creating)?;

        let body = Value::Object(codec::encode(&self.schema, desired, EncodeMode::Create)?);
        let data = self
            .send(Method::Post, &self.schema.collection_path(), Some(&body))
            .await?
            .data_object()?;
        let id = self.created_id(&data)?;
        info!("Created {} {}", self.schema.type_name, id);

        if let (Some(spec), Some(targets)) = (&self.schema.association, &desired.associations) {
            let targets = dedup_targets(targets);
            if !targets.is_empty() {
                let batch = association::diff(&id, &targets, &[]);
                self.send(Method::Patch, &self.schema.entity_path(&id), Some(&batch.to_patch(spec)))
                    .await
                    .inspect_err(|e| {
                        warn!(
                            "{} {} was created but attaching {} failed: {}",
                            self.schema.type_name, id, spec.field, e
                        );
                    })?;
            }
        }

        let record = self.refetch(&id).await?;
        phase.advance(EntityPhase::Present)?;
        Ok(record)
    }

    async fn read(&self, id: &RemoteId) -> SyncResult<ReadOutcome> {
        debug!("Refreshing {} {}", self.schema.type_name, id);
        match self.fetch(id).await? {
            Some(record) => Ok(ReadOutcome::Present(record)),
            None => {
                warn!(
                    "{} {} no longer exists remotely, dropping from tracking",
                    self.schema.type_name, id
                );
                Ok(ReadOutcome::Gone)
            }
        }
    }

    async fn update(&self, id: &RemoteId, desired: &Record) -> SyncResult<Record> {
        let mut phase = self.tracker(EntityPhase::Present);
        phase.advance(EntityPhase::Updating)?;

        let body = Value::Object(codec::encode(&self.schema, desired, EncodeMode::Update)?);
        self.send(Method::Patch, &self.schema.entity_path(id), Some(&body))
            .await?;

        if let (Some(spec), Some(targets)) = (&self.schema.association, &desired.associations) {
            self.reconcile_associations(spec, id, targets).await?;
        }

        let record = self.refetch(id).await?;
        phase.advance(EntityPhase::Present)?;
        Ok(record)
    }

    async fn delete(&self, id: &RemoteId) -> SyncResult<()> {
        if self.schema.singleton {
            let mut phase = self.tracker(EntityPhase::Present);
            phase.advance(EntityPhase::Absent)?;
            info!(
                "Detached {} singleton from tracking; remote values left in place",
                self.schema.type_name
            );
            return Ok(());
        }

        let mut phase = self.tracker(EntityPhase::Present);
        phase.advance(EntityPhase::Deleting)?;

        let response = self.api.delete(&self.schema.entity_path(id)).await?;
        if response.is_not_found() {
            info!("{} {} was already absent", self.schema.type_name, id);
        } else {
            response.error_for_status()?;
            info!("Deleted {} {}", self.schema.type_name, id);
        }

        phase.advance(EntityPhase::Absent)?;
        Ok(())
    }

    async fn import(&self, raw_id: &str) -> SyncResult<Record> {
        let id = self.schema.id_kind.parse(raw_id).map_err(|_| SyncError::InvalidId {
            kind: self.schema.type_name.clone(),
            value: raw_id.to_string(),
        })?;

        match self.read(&id).await? {
            ReadOutcome::Present(record) => {
                info!("Imported {} {}", self.schema.type_name, id);
                Ok(record)
            }
            ReadOutcome::Gone => Err(SyncError::NotFound {
                kind: self.schema.type_name.clone(),
                id: id.to_string(),
            }),
        }
    }
}
