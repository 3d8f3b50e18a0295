//! Desired-state reconciliation for Directus configuration.
//!
//! # Components
//!
//! - **Codec**: typed records to and from the API's loosely-typed JSON,
//!   with separate create and update encodings
//! - **Association**: set diff over `(owner, target)` pairs, batched into
//!   one junction patch
//! - **Synchronizer**: create, read, update, delete and import for one
//!   resource kind, each finishing with a canonical re-read
//! - **State**: the lifecycle phase machine each operation walks
//!
//! Nothing here retries, caches, or locks. The host runs one operation per
//! entity at a time and owns any persisted state.
//!
//! # Example
//!
//! ```no_run
//! use directus_client::{ClientConfig, DirectusClient};
//! use directus_model::{kinds, FieldValue, Record};
//! use directus_sync::{EntitySynchronizer, ResourceLifecycle};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DirectusClient::new(&ClientConfig::new("https://cms.example.com").with_token("t"))?;
//! let roles = EntitySynchronizer::new(Arc::new(client), kinds::role());
//!
//! let desired = Record::new()
//!     .with("name", FieldValue::Text("Editors".into()))
//!     .with_associations(["policy-a"]);
//! let created = roles.create(&desired).await?;
//! # let _ = created;
//! # Ok(())
//! # }
//! ```

pub mod association;
pub mod codec;
mod error;
mod lifecycle;
pub mod state;
mod synchronizer;

pub use association::{Association, AssociationDiff};
pub use codec::EncodeMode;
pub use error::{SyncError, SyncResult};
pub use lifecycle::{ReadOutcome, ResourceLifecycle};
pub use state::EntityPhase;
pub use synchronizer::EntitySynchronizer;
