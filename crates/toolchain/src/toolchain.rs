//! Toolchain registry and subprocess execution
//!
//! A toolchain pairs an invocation command with a flag template set. The
//! registry is a fixed, closed set constructed from static data; unknown
//! names are a configuration error surfaced before any job is constructed.

use anvil_errors::{BuildError, ConfigError, Error};
use anvil_events::{AppEvent, BuildEvent, EventEmitter};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::process::Command;
use tracing::debug;

use crate::flags::{Flagset, GNULIKE_FLAGS, MSVC_FLAGS};

/// One supported C/C++ toolchain
#[derive(Debug, Clone, Copy)]
pub struct Toolchain {
    /// Registry name, e.g. `gcc`
    pub name: &'static str,
    /// Invocation command, e.g. `cl.exe`
    pub command: &'static str,
    /// Flag templates for this toolchain's command-line grammar
    pub flags: Flagset,
}

static TOOLCHAINS: &[Toolchain] = &[
    Toolchain {
        name: "gcc",
        command: "gcc",
        flags: GNULIKE_FLAGS,
    },
    Toolchain {
        name: "clang",
        command: "clang",
        flags: GNULIKE_FLAGS,
    },
    Toolchain {
        name: "cl",
        command: "cl.exe",
        flags: MSVC_FLAGS,
    },
];

/// Look up a toolchain by registry name.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownToolchain`] for names outside the closed
/// set.
pub fn lookup(name: &str) -> Result<&'static Toolchain, Error> {
    TOOLCHAINS
        .iter()
        .find(|tc| tc.name == name)
        .ok_or_else(|| {
            ConfigError::UnknownToolchain {
                name: name.to_string(),
            }
            .into()
        })
}

/// Names of all registered toolchains
#[must_use]
pub fn toolchain_names() -> Vec<&'static str> {
    TOOLCHAINS.iter().map(|tc| tc.name).collect()
}

impl Toolchain {
    /// Whether the invocation command can be found on PATH
    #[must_use]
    pub fn is_available(&self) -> bool {
        which::which(self.command).is_ok()
    }

    /// Compile one source file into an object file under `out_dir`.
    ///
    /// Skips the invocation entirely when the object already exists and is
    /// strictly newer than the source; equal timestamps recompile. Only the
    /// source file itself is considered, headers it includes are not
    /// tracked. In dry-run mode the command line is emitted as an event and
    /// reported as success.
    ///
    /// Returns the object file path. Compiler diagnostics pass through to
    /// the operator's streams; the orchestrator only observes the exit
    /// status.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::CompileFailed`] on a non-zero exit status and
    /// [`BuildError::SpawnFailed`] when the command cannot be started.
    #[allow(clippy::too_many_arguments)]
    pub async fn compile_object(
        &self,
        root: &Path,
        source: &Path,
        out_dir: &Path,
        include_dirs: &[PathBuf],
        debug_mode: bool,
        dry_run: bool,
        emitter: &impl EventEmitter,
    ) -> Result<PathBuf, Error> {
        let stem = source
            .file_stem()
            .and_then(OsStr::to_str)
            .ok_or_else(|| Error::internal(format!("unnamed source file: {}", source.display())))?;
        let object = out_dir.join(self.flags.object_file_name(stem));
        let object_name = file_name(&object);

        if let Ok(object_meta) = fs::metadata(&object).await {
            let source_meta = fs::metadata(source)
                .await
                .map_err(|e| Error::io_with_path(&e, source))?;
            if let (Ok(source_mtime), Ok(object_mtime)) =
                (source_meta.modified(), object_meta.modified())
            {
                if source_mtime < object_mtime {
                    emitter.emit(AppEvent::Build(BuildEvent::CompileSkipped {
                        object: object_name,
                    }));
                    return Ok(object);
                }
            }
        }

        emitter.emit(AppEvent::Build(BuildEvent::CompileStarted {
            object: object_name.clone(),
        }));

        let lang = source
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .unwrap_or_default();
        let command =
            self.flags
                .object_command(self.command, source, &object, include_dirs, &lang, debug_mode);

        if dry_run {
            emitter.emit(AppEvent::Build(BuildEvent::CommandEmitted { command }));
            return Ok(object);
        }

        if self.run_shell(root, &command, emitter).await? {
            Ok(object)
        } else {
            Err(BuildError::CompileFailed {
                object: object_name,
            }
            .into())
        }
    }

    /// Link object files into an executable at `output`.
    ///
    /// Object order is preserved as given, which is the compile order.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::LinkFailed`] on a non-zero exit status and
    /// [`BuildError::SpawnFailed`] when the command cannot be started.
    #[allow(clippy::too_many_arguments)]
    pub async fn link_executable(
        &self,
        root: &Path,
        objects: &[PathBuf],
        output: &Path,
        libs: &[String],
        link_flags: &[String],
        debug_mode: bool,
        dry_run: bool,
        emitter: &impl EventEmitter,
    ) -> Result<(), Error> {
        let exe_name = file_name(output);
        emitter.emit(AppEvent::Build(BuildEvent::LinkStarted {
            exe: exe_name.clone(),
        }));

        let command = self.flags.executable_command(
            self.command,
            objects,
            output,
            libs,
            link_flags,
            debug_mode,
        );

        if dry_run {
            emitter.emit(AppEvent::Build(BuildEvent::CommandEmitted { command }));
            return Ok(());
        }

        if self.run_shell(root, &command, emitter).await? {
            Ok(())
        } else {
            Err(BuildError::LinkFailed { exe: exe_name }.into())
        }
    }

    /// Run a flat command line through the platform shell with the build
    /// root as working directory. Stdio is inherited so toolchain
    /// diagnostics reach the operator directly.
    async fn run_shell(
        &self,
        root: &Path,
        command: &str,
        emitter: &impl EventEmitter,
    ) -> Result<bool, Error> {
        emitter.emit_debug(format!("executing: {command}"));
        debug!(toolchain = self.name, command, "spawning toolchain process");

        let status = shell_command(command)
            .current_dir(root)
            .status()
            .await
            .map_err(|e| BuildError::SpawnFailed {
                command: self.command.to_string(),
                message: e.to_string(),
            })?;
        Ok(status.success())
    }
}

fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(OsStr::to_str)
        .unwrap_or_default()
        .to_string()
}
