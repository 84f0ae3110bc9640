#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Job orchestration for the anvil build orchestrator
//!
//! A [`Job`] owns one resolved build configuration and one toolchain and
//! drives the pipeline: discover source files, compile each one to an
//! object file, link the objects into a single executable. Phases run
//! strictly in sequence and the first failure aborts the whole build.

use anvil_config::BuildConfig;
use anvil_errors::{Error, Result};
use anvil_events::{AppEvent, BuildEvent, EventEmitter, EventSender};
use anvil_toolchain::Toolchain;
use anvil_types::{executable_name, Language};
use ignore::WalkBuilder;
use std::ffi::OsStr;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// One build invocation: configuration snapshot plus orchestration state.
///
/// Created per invocation and discarded after [`Job::act`] returns; a job is
/// never reused across builds.
pub struct Job {
    config: BuildConfig,
    toolchain: Toolchain,
    /// Discovered source files, in traversal order
    sources: Vec<PathBuf>,
    /// Object files, one per compiled source, same order as `sources`
    objects: Vec<PathBuf>,
    event_sender: Option<EventSender>,
}

impl EventEmitter for Job {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

impl Job {
    /// Create a job over a resolved configuration and a selected toolchain
    #[must_use]
    pub fn new(config: BuildConfig, toolchain: Toolchain) -> Self {
        Self {
            config,
            toolchain,
            sources: Vec::new(),
            objects: Vec::new(),
            event_sender: None,
        }
    }

    /// Attach an event sender for progress reporting
    #[must_use]
    pub fn with_event_sender(mut self, event_sender: EventSender) -> Self {
        self.event_sender = Some(event_sender);
        self
    }

    /// The configuration this job was created with
    #[must_use]
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Source files found by discovery, in traversal order
    #[must_use]
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Object files produced so far; tracks `sources` one-for-one only
    /// after a fully successful compile phase
    #[must_use]
    pub fn objects(&self) -> &[PathBuf] {
        &self.objects
    }

    /// Run the full pipeline: discovery, directory preparation, per-file
    /// compilation, linking.
    ///
    /// Fail-fast: the first compile failure aborts the remaining sources
    /// and linking never happens. Nothing is retried; a failed object was
    /// never produced, so a rerun re-attempts it.
    ///
    /// # Errors
    ///
    /// Returns the first error of any phase; `Ok(())` means discovery,
    /// every compile, and the link all succeeded.
    pub async fn act(&mut self) -> Result<()> {
        self.discover_sources();
        self.prepare_directories().await?;
        self.compile_all_objects().await?;
        self.link_executable().await
    }

    /// Recursively collect compilable sources under the source directory.
    ///
    /// A file qualifies if its extension (case-sensitive, no leading dot)
    /// names a supported language. Traversal order is walker enumeration
    /// order; it determines compile and link order.
    fn discover_sources(&mut self) {
        for entry in WalkBuilder::new(&self.config.src)
            .standard_filters(false)
            .build()
            .flatten()
        {
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let path = entry.path();
            let known = path
                .extension()
                .and_then(OsStr::to_str)
                .and_then(Language::from_extension);
            if known.is_some() {
                self.sources.push(path.to_path_buf());
            }
        }
        debug!(count = self.sources.len(), "discovered source files");
    }

    /// Ensure the output directories exist; on a clean build, remove stale
    /// objects from a pre-existing object directory.
    async fn prepare_directories(&self) -> Result<()> {
        create_dir(&self.config.bin).await?;

        let obj_existed = self.config.obj.is_dir();
        if obj_existed {
            if self.config.clean {
                self.clean_objects();
            }
        } else {
            create_dir(&self.config.obj).await?;
        }
        Ok(())
    }

    /// Delete every file under the object directory carrying the active
    /// toolchain's object extension. A flat extension filter, so objects
    /// left by a different toolchain stay untouched. Deletion failures are
    /// tolerated; anything that survives is overwritten or ignored later.
    fn clean_objects(&self) {
        self.emit(AppEvent::Build(BuildEvent::CleanStarted {
            directory: self.config.obj.clone(),
        }));
        for entry in WalkBuilder::new(&self.config.obj)
            .standard_filters(false)
            .build()
            .flatten()
        {
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(OsStr::to_str) == Some(self.toolchain.flags.obj_ext) {
                let _ = std::fs::remove_file(path);
            }
        }
    }

    /// Compile every discovered source, in discovery order, aborting on the
    /// first failure.
    async fn compile_all_objects(&mut self) -> Result<()> {
        for index in 0..self.sources.len() {
            let object = self
                .toolchain
                .compile_object(
                    &self.config.root,
                    &self.sources[index],
                    &self.config.obj,
                    &self.config.include_dirs,
                    self.config.debug,
                    self.config.dry_run,
                    &self.event_sender,
                )
                .await?;
            self.objects.push(object);
        }
        Ok(())
    }

    /// Link all objects, in compile order, into the configured executable.
    async fn link_executable(&self) -> Result<()> {
        let output = self.config.bin.join(executable_name(&self.config.exe));
        self.toolchain
            .link_executable(
                &self.config.root,
                &self.objects,
                &output,
                &self.config.libs,
                &self.config.link_flags,
                self.config.debug,
                self.config.dry_run,
                &self.event_sender,
            )
            .await
    }
}

async fn create_dir(path: &std::path::Path) -> Result<()> {
    fs::create_dir_all(path).await.map_err(|e| {
        Error::from(anvil_errors::BuildError::DirectoryFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    })
}
