//! Entity lifecycle phases.
//!
//! ```text
//! absent ──► creating ──► present ◄──► updating
//!                            │
//!                            ▼
//!                        deleting ──► absent
//! ```
//!
//! Singletons never pass through `creating` or `deleting`: their "create" is
//! `absent → updating → present` and their "delete" is `present → absent`.

use crate::error::{SyncError, SyncResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityPhase {
    Absent,
    Creating,
    Present,
    Updating,
    Deleting,
}

impl EntityPhase {
    /// Whether `self → next` is a legal step for the given entity shape.
    #[must_use]
    pub fn can_transition(self, next: Self, singleton: bool) -> bool {
        use EntityPhase::{Absent, Creating, Deleting, Present, Updating};
        match (self, next) {
            (Absent, Creating) | (Creating, Present) | (Present, Deleting) | (Deleting, Absent) => {
                !singleton
            }
            (Absent, Updating) | (Present, Absent) => singleton,
            (Present, Updating) | (Updating, Present) | (Present, Present) => true,
            _ => false,
        }
    }
}

impl fmt::Display for EntityPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityPhase::Absent => "absent",
            EntityPhase::Creating => "creating",
            EntityPhase::Present => "present",
            EntityPhase::Updating => "updating",
            EntityPhase::Deleting => "deleting",
        })
    }
}

/// Tracks the phase of one entity through a single lifecycle operation.
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    kind: String,
    singleton: bool,
    phase: EntityPhase,
}

impl PhaseTracker {
    #[must_use]
    pub fn new(kind: impl Into<String>, singleton: bool, start: EntityPhase) -> Self {
        Self {
            kind: kind.into(),
            singleton,
            phase: start,
        }
    }

    #[must_use]
    pub fn phase(&self) -> EntityPhase {
        self.phase
    }

    /// Moves to `next`, rejecting steps the state machine does not allow.
    pub fn advance(&mut self, next: EntityPhase) -> SyncResult<()> {
        if !self.phase.can_transition(next, self.singleton) {
            return Err(SyncError::Unsupported(format!(
                "{} cannot move from {} to {}",
                self.kind, self.phase, next
            )));
        }
        debug!("{}: {} -> {}", self.kind, self.phase, next);
        self.phase = next;
        Ok(())
    }
}
