//! The per-kind lifecycle interface the host dispatches into.

use crate::error::SyncResult;
use async_trait::async_trait;
use directus_model::Record;
use directus_types::RemoteId;

/// Result of a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The canonical remote record.
    Present(Record),
    /// The entity no longer exists; the host should stop tracking it.
    Gone,
}

impl ReadOutcome {
    pub fn into_record(self) -> Option<Record> {
        match self {
            ReadOutcome::Present(record) => Some(record),
            ReadOutcome::Gone => None,
        }
    }
}

/// One method per lifecycle phase. Every method takes the full desired state
/// (where relevant) and returns the canonical record re-read from the API.
///
/// Implementations do not serialize calls; the host must not run two
/// operations on the same entity concurrently.
#[async_trait]
pub trait ResourceLifecycle: Send + Sync {
    /// Local kind name, e.g. "role".
    fn kind(&self) -> &str;

    async fn create(&self, desired: &Record) -> SyncResult<Record>;

    async fn read(&self, id: &RemoteId) -> SyncResult<ReadOutcome>;

    async fn update(&self, id: &RemoteId, desired: &Record) -> SyncResult<Record>;

    /// Removes the entity. A 404 counts as success.
    async fn delete(&self, id: &RemoteId) -> SyncResult<()>;

    /// Adopts an existing entity from a user-supplied ID string.
    async fn import(&self, raw_id: &str) -> SyncResult<Record>;
}
