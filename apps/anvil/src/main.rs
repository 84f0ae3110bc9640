//! anvil - minimal build orchestrator for C/C++ projects
//!
//! This is the CLI application that resolves the layered build
//! configuration, selects a toolchain, and drives the job pipeline while
//! rendering its event stream.

mod cli;
mod error;
mod events;
mod logging;
mod scaffold;

use crate::cli::{BuildOverrides, Cli, Commands};
use crate::error::CliError;
use crate::events::EventHandler;
use anvil_builder::Job;
use anvil_config::{BuildConfig, Layer, Manifest};
use anvil_events::{AppEvent, BuildEvent, EventEmitter, EventReceiver};
use anvil_toolchain::{lookup, toolchain_names};
use anvil_types::ColorChoice;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.global.verbose);

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting anvil v{}", env!("CARGO_PKG_VERSION"));

    let colors_enabled = match cli.global.color.unwrap_or_default() {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stdout().features().colors_supported(),
    };
    let mut handler = EventHandler::new(colors_enabled, cli.global.verbose);

    match cli.command {
        Commands::Build { project, overrides } => build(project, overrides, &mut handler).await,
        Commands::Init { project, overrides } => init(project, overrides, &mut handler).await,
        Commands::Toolchains => {
            list_toolchains();
            Ok(())
        }
    }
}

/// Resolve the layered configuration for a project directory.
///
/// Precedence: defaults < project manifest < CLI flags. A missing manifest
/// is an empty layer, so a build can be described entirely by flags.
async fn resolve_config(project: &Path, overrides: BuildOverrides) -> Result<BuildConfig, CliError> {
    let manifest_path = Manifest::path_in(project);
    let manifest = if manifest_path.exists() {
        Manifest::load_from_file(&manifest_path).await?
    } else {
        info!(path = %manifest_path.display(), "no manifest, using flags only");
        Manifest::default()
    };

    let merged = Layer::default()
        .merge(manifest.into_layer())
        .merge(overrides.into_layer());
    BuildConfig::resolve(project, merged).map_err(CliError::from)
}

/// Run the build pipeline for a project
async fn build(
    project: Option<PathBuf>,
    overrides: BuildOverrides,
    handler: &mut EventHandler,
) -> Result<(), CliError> {
    let start = Instant::now();
    let project = project.unwrap_or_else(|| PathBuf::from("."));
    if !project.is_dir() {
        return Err(CliError::InvalidArguments(format!(
            "project directory does not exist: {}",
            project.display()
        )));
    }

    let config = resolve_config(&project, overrides).await?;
    config.validate()?;
    let toolchain = *lookup(&config.cc)?;

    let (event_sender, event_receiver) = anvil_events::channel();
    if !config.dry_run && !toolchain.is_available() {
        event_sender.emit_warning(format!("{} was not found on PATH", toolchain.command));
    }
    event_sender.emit(AppEvent::Build(BuildEvent::SessionStarted {
        project: config.exe.clone(),
        toolchain: toolchain.name.to_string(),
    }));

    let mut job = Job::new(config, toolchain).with_event_sender(event_sender);
    drive_job(&mut job, event_receiver, handler, start).await
}

/// Execute the job while draining its event stream concurrently
async fn drive_job(
    job: &mut Job,
    mut event_receiver: EventReceiver,
    handler: &mut EventHandler,
    start: Instant,
) -> Result<(), CliError> {
    let mut job_future = Box::pin(job.act());
    let result = loop {
        select! {
            // Job completed
            result = &mut job_future => break result,

            // Event received
            event = event_receiver.recv() => {
                match event {
                    Some(event) => handler.handle_event(&event),
                    None => { /* Channel closed: keep waiting for the job to finish */ }
                }
            }
        }
    };
    drop(job_future);

    if result.is_ok() {
        job.emit(AppEvent::Build(BuildEvent::SessionCompleted {
            project: job.config().exe.clone(),
            duration: start.elapsed(),
        }));
    }

    // Drain any remaining events
    while let Ok(event) = event_receiver.try_recv() {
        handler.handle_event(&event);
    }

    result.map_err(CliError::from)
}

/// Scaffold a new project
async fn init(
    project: Option<PathBuf>,
    overrides: BuildOverrides,
    handler: &mut EventHandler,
) -> Result<(), CliError> {
    let start = Instant::now();
    let project = project.unwrap_or_else(|| PathBuf::from("."));

    // Conventional starter layout; flags and an eventual manifest refine it
    let defaults = Layer {
        src: Some(PathBuf::from("src")),
        bin: Some(PathBuf::from("bin")),
        obj: Some(PathBuf::from("bin/obj")),
        cc: Some("gcc".to_string()),
        exe: Some(project_name(&project)),
        ..Layer::default()
    };
    let replace = overrides.clean;
    let merged = defaults.merge(overrides.into_layer());
    let config = BuildConfig::resolve(&project, merged)?;
    lookup(&config.cc)?;

    let (event_sender, mut event_receiver) = anvil_events::channel();
    event_sender.emit_operation_started(format!("Initializing project at {}", project.display()));

    let result = scaffold::init_project(&config, &project, replace, &event_sender).await;
    if result.is_ok() {
        event_sender.emit_operation_completed(
            format!("Finished in {:.1}s", start.elapsed().as_secs_f64()),
            true,
        );
    }

    drop(event_sender);
    while let Some(event) = event_receiver.recv().await {
        handler.handle_event(&event);
    }

    result.map_err(CliError::from)
}

/// Name a freshly scaffolded executable after its project directory
fn project_name(project: &Path) -> String {
    let canonical = project
        .canonicalize()
        .unwrap_or_else(|_| project.to_path_buf());
    canonical
        .file_name()
        .and_then(|name| name.to_str())
        .map_or_else(|| "app".to_string(), ToString::to_string)
}

/// Print the closed toolchain registry with availability information
fn list_toolchains() {
    for name in toolchain_names() {
        if let Ok(toolchain) = lookup(name) {
            let status = if toolchain.is_available() {
                "available"
            } else {
                "not found on PATH"
            };
            println!("{:<8} {:<10} {status}", toolchain.name, toolchain.command);
        }
    }
}
