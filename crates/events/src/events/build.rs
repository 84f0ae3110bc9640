use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Build-specific events for the event system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BuildEvent {
    /// Build started for a project
    SessionStarted { project: String, toolchain: String },

    /// Build finished successfully
    SessionCompleted { project: String, duration: Duration },

    /// Stale objects are being removed before compilation
    CleanStarted { directory: PathBuf },

    /// One source file is being compiled to an object
    CompileStarted { object: String },

    /// Compilation skipped, the object is already newer than its source
    CompileSkipped { object: String },

    /// Objects are being linked into the executable
    LinkStarted { exe: String },

    /// Dry run: the command line that would have been executed
    CommandEmitted { command: String },
}
