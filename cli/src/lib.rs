//! Host-side pieces of the `directus-sync` binary: the tracked-state file and
//! the lifecycle commands that read and update it.

mod commands;
mod tracked;

pub use commands::{apply, destroy, import, refresh};
pub use tracked::{load_desired, TrackedState};
