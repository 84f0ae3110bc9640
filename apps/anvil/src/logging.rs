//! Structured logging integration for events
//!
//! Console rendering is the event handler's job; this module mirrors the
//! event stream into the tracing infrastructure so `--verbose` and
//! `RUST_LOG` get structured records.

use anvil_events::{AppEvent, BuildEvent, GeneralEvent};
use tracing::{debug, error, info, warn};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the verbose flag picks between
/// debug- and warn-level output for the anvil crates.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "anvil=debug,anvil_builder=debug,anvil_config=debug,anvil_toolchain=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}

/// Log an `AppEvent` with structured fields
pub fn log_event(event: &AppEvent) {
    match event {
        AppEvent::Build(build) => match build {
            BuildEvent::SessionStarted { project, toolchain } => {
                info!(project = %project, toolchain = %toolchain, "build started");
            }
            BuildEvent::SessionCompleted { project, duration } => {
                info!(project = %project, seconds = duration.as_secs_f64(), "build completed");
            }
            BuildEvent::CleanStarted { directory } => {
                info!(directory = %directory.display(), "cleaning stale objects");
            }
            BuildEvent::CompileStarted { object } => {
                debug!(object = %object, "compiling");
            }
            BuildEvent::CompileSkipped { object } => {
                debug!(object = %object, "up to date");
            }
            BuildEvent::LinkStarted { exe } => {
                debug!(exe = %exe, "linking");
            }
            BuildEvent::CommandEmitted { command } => {
                debug!(command = %command, "dry run");
            }
        },
        AppEvent::General(general) => match general {
            GeneralEvent::Warning { message, context } => {
                warn!(context = ?context, "{message}");
            }
            GeneralEvent::Error { message, details } => {
                error!(details = ?details, "{message}");
            }
            GeneralEvent::DebugLog { message } => debug!("{message}"),
            GeneralEvent::OperationStarted { operation } => {
                info!(operation = %operation, "operation started");
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                info!(operation = %operation, success = *success, "operation completed");
            }
            GeneralEvent::OperationFailed { operation, error } => {
                error!(operation = %operation, "operation failed: {error}");
            }
        },
    }
}
