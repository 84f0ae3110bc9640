#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for anvil
//!
//! This crate handles loading and merging build configuration from:
//! - Default values (hard-coded)
//! - The per-project manifest (`anvil.toml`)
//! - CLI flags
//!
//! Layers are represented as immutable [`Layer`] records merged by a pure
//! function: later layers win field-by-field, boolean flags combine by
//! logical OR. The merged layer resolves into a [`BuildConfig`], the
//! immutable description of one build that the job orchestrator consumes.

use anvil_errors::{ConfigError, Error};
use std::path::{Path, PathBuf};

mod manifest;
pub use manifest::{Manifest, MANIFEST_FILE_NAME};

/// One configuration layer: every field optional, booleans default-off.
///
/// Defaults, the project manifest, and CLI flags all normalize into this
/// record before merging, which keeps the precedence rule auditable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layer {
    pub root: Option<PathBuf>,
    pub src: Option<PathBuf>,
    pub bin: Option<PathBuf>,
    pub obj: Option<PathBuf>,
    pub cc: Option<String>,
    pub exe: Option<String>,
    pub libs: Option<Vec<String>>,
    pub link: Option<Vec<String>>,
    pub incl: Option<Vec<PathBuf>>,
    pub clean: bool,
    pub debug: bool,
    pub dry_run: bool,
}

impl Layer {
    /// Merge `upper` over `self`: set fields in `upper` win, booleans OR.
    #[must_use]
    pub fn merge(self, upper: Layer) -> Layer {
        Layer {
            root: upper.root.or(self.root),
            src: upper.src.or(self.src),
            bin: upper.bin.or(self.bin),
            obj: upper.obj.or(self.obj),
            cc: upper.cc.or(self.cc),
            exe: upper.exe.or(self.exe),
            libs: upper.libs.or(self.libs),
            link: upper.link.or(self.link),
            incl: upper.incl.or(self.incl),
            clean: self.clean || upper.clean,
            debug: self.debug || upper.debug,
            dry_run: self.dry_run || upper.dry_run,
        }
    }
}

/// Fully-resolved, immutable description of one build.
///
/// Owned by the job that wraps it and treated as a snapshot; nothing mutates
/// it after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Working directory for every toolchain invocation
    pub root: PathBuf,
    /// Where source files are discovered
    pub src: PathBuf,
    /// Where the final executable lands
    pub bin: PathBuf,
    /// Where object files land
    pub obj: PathBuf,
    /// Executable name, without platform suffix
    pub exe: String,
    /// Toolchain name, resolved against the registry before a job starts
    pub cc: String,
    /// Libraries to link against, in link order
    pub libs: Vec<String>,
    /// Raw flags passed through to the linker, in order
    pub link_flags: Vec<String>,
    /// Include directories passed to every compile, in order
    pub include_dirs: Vec<PathBuf>,
    /// Remove stale objects before compiling
    pub clean: bool,
    /// Build with the debug flag bundle instead of the optimized one
    pub debug: bool,
    /// Report command lines instead of executing them
    pub dry_run: bool,
}

impl BuildConfig {
    /// Resolve a merged layer against a project directory.
    ///
    /// Applies the default chain: `root` defaults to the project directory,
    /// `src` and `bin` default to `root`, `obj` defaults to `bin`. Relative
    /// paths are anchored at `root`; include directories likewise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when `exe` or `cc` is absent
    /// or empty.
    pub fn resolve(project: &Path, layer: Layer) -> Result<Self, Error> {
        let root = match layer.root {
            Some(root) => project.join(root),
            None => project.to_path_buf(),
        };
        let src = join_or(&root, layer.src.as_deref(), &root);
        let bin = join_or(&root, layer.bin.as_deref(), &root);
        let obj = join_or(&root, layer.obj.as_deref(), &bin);

        let exe = layer.exe.filter(|e| !e.is_empty()).ok_or_else(|| {
            Error::from(ConfigError::MissingField {
                field: "exe".to_string(),
            })
        })?;
        let cc = layer.cc.filter(|c| !c.is_empty()).ok_or_else(|| {
            Error::from(ConfigError::MissingField {
                field: "cc".to_string(),
            })
        })?;

        let include_dirs = layer
            .incl
            .unwrap_or_default()
            .into_iter()
            .map(|dir| if dir.is_absolute() { dir } else { root.join(dir) })
            .collect();

        Ok(Self {
            root,
            src,
            bin,
            obj,
            exe,
            cc,
            libs: layer.libs.unwrap_or_default(),
            link_flags: layer.link.unwrap_or_default(),
            include_dirs,
            clean: layer.clean,
            debug: layer.debug,
            dry_run: layer.dry_run,
        })
    }

    /// Check that the directories a build reads from exist.
    ///
    /// `bin` and `obj` only need to be creatable and are prepared by the
    /// job; `root` and `src` must already be present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDirectory`] naming the first missing
    /// directory.
    pub fn validate(&self) -> Result<(), Error> {
        for dir in [&self.root, &self.src] {
            if !dir.is_dir() {
                return Err(ConfigError::MissingDirectory {
                    path: dir.display().to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

fn join_or(root: &Path, value: Option<&Path>, fallback: &Path) -> PathBuf {
    match value {
        Some(path) => root.join(path),
        None => fallback.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_layer() -> Layer {
        Layer {
            cc: Some("gcc".to_string()),
            exe: Some("app".to_string()),
            ..Layer::default()
        }
    }

    #[test]
    fn merge_upper_fields_win() {
        let lower = Layer {
            cc: Some("gcc".to_string()),
            exe: Some("app".to_string()),
            src: Some(PathBuf::from("src")),
            ..Layer::default()
        };
        let upper = Layer {
            cc: Some("clang".to_string()),
            clean: true,
            ..Layer::default()
        };
        let merged = lower.merge(upper);
        assert_eq!(merged.cc.as_deref(), Some("clang"));
        assert_eq!(merged.exe.as_deref(), Some("app"));
        assert_eq!(merged.src, Some(PathBuf::from("src")));
        assert!(merged.clean);
    }

    #[test]
    fn merge_booleans_combine_by_or() {
        let lower = Layer {
            debug: true,
            ..minimal_layer()
        };
        let upper = Layer {
            clean: true,
            ..Layer::default()
        };
        let merged = lower.merge(upper);
        assert!(merged.clean);
        assert!(merged.debug);
        assert!(!merged.dry_run);
    }

    #[test]
    fn resolve_applies_default_chain() {
        let config = BuildConfig::resolve(Path::new("/proj"), minimal_layer()).unwrap();
        assert_eq!(config.root, Path::new("/proj"));
        assert_eq!(config.src, Path::new("/proj"));
        assert_eq!(config.bin, Path::new("/proj"));
        assert_eq!(config.obj, Path::new("/proj"));
    }

    #[test]
    fn resolve_obj_defaults_to_bin() {
        let layer = Layer {
            bin: Some(PathBuf::from("out")),
            ..minimal_layer()
        };
        let config = BuildConfig::resolve(Path::new("/proj"), layer).unwrap();
        assert_eq!(config.bin, Path::new("/proj/out"));
        assert_eq!(config.obj, Path::new("/proj/out"));
    }

    #[test]
    fn resolve_requires_exe_and_cc() {
        let missing_exe = Layer {
            cc: Some("gcc".to_string()),
            ..Layer::default()
        };
        assert!(BuildConfig::resolve(Path::new("/proj"), missing_exe).is_err());

        let empty_cc = Layer {
            cc: Some(String::new()),
            exe: Some("app".to_string()),
            ..Layer::default()
        };
        assert!(BuildConfig::resolve(Path::new("/proj"), empty_cc).is_err());
    }

    #[test]
    fn resolve_anchors_include_dirs_at_root() {
        let layer = Layer {
            root: Some(PathBuf::from("nested")),
            incl: Some(vec![PathBuf::from("vendor"), PathBuf::from("/abs")]),
            ..minimal_layer()
        };
        let config = BuildConfig::resolve(Path::new("/proj"), layer).unwrap();
        assert_eq!(
            config.include_dirs,
            vec![PathBuf::from("/proj/nested/vendor"), PathBuf::from("/abs")]
        );
    }
}
