//! Event-driven hook runner.
//!
//! Maps a Lidarr event to a sequence of discovery, transcoding and Lidarr calls,
//! and every way that sequence can end to a process exit code.

mod runner;
mod types;

pub use runner::HookRunner;
pub use types::{HookError, RunOutcome};
