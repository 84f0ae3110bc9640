//! The persisted per-project manifest (`anvil.toml`)

use anvil_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::{BuildConfig, Layer};

/// File name of the project manifest, looked up in the project directory
pub const MANIFEST_FILE_NAME: &str = "anvil.toml";

/// On-disk project record. Every field is optional; omitted fields
/// reconstruct as their defaults when the manifest is resolved, and fields
/// equal to their defaults are omitted on write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obj: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub libs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incl: Option<Vec<PathBuf>>,
}

impl Manifest {
    /// Path of the manifest inside a project directory
    #[must_use]
    pub fn path_in(project: &Path) -> PathBuf {
        project.join(MANIFEST_FILE_NAME)
    }

    /// Load a manifest from a file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ManifestNotFound`] if the file cannot be read
    /// and [`ConfigError::ParseError`] if it is not valid TOML.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents =
            fs::read_to_string(path)
                .await
                .map_err(|_| ConfigError::ManifestNotFound {
                    path: path.display().to_string(),
                })?;

        debug!(path = %path.display(), "loaded project manifest");
        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Save the manifest, omitting unset fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SerializeError`] if the record cannot be
    /// serialized and [`ConfigError::WriteError`] if the file cannot be
    /// written.
    pub async fn save_to_file(&self, path: &Path) -> Result<(), Error> {
        let body = toml::to_string(self).map_err(|e| ConfigError::SerializeError {
            error: e.to_string(),
        })?;
        let contents = format!("# generated by anvil init\n{body}");

        fs::write(path, contents)
            .await
            .map_err(|e| ConfigError::WriteError {
                path: path.display().to_string(),
                error: e.to_string(),
            })?;
        Ok(())
    }

    /// Convert into a configuration layer for merging
    #[must_use]
    pub fn into_layer(self) -> Layer {
        Layer {
            root: self.root,
            src: self.src,
            bin: self.bin,
            obj: self.obj,
            cc: self.cc,
            exe: self.exe,
            libs: self.libs,
            link: self.link,
            incl: self.incl,
            clean: false,
            debug: false,
            dry_run: false,
        }
    }

    /// Build the persisted record for a resolved configuration.
    ///
    /// Paths are stored relative to the build root where possible and
    /// default-valued fields are left unset: `src`/`bin` when equal to the
    /// root, `obj` when equal to `bin`, list fields when empty.
    #[must_use]
    pub fn from_config(config: &BuildConfig) -> Self {
        let relative = |path: &Path| -> PathBuf {
            path.strip_prefix(&config.root)
                .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
        };

        Self {
            root: None,
            src: (config.src != config.root).then(|| relative(&config.src)),
            bin: (config.bin != config.root).then(|| relative(&config.bin)),
            obj: (config.obj != config.bin).then(|| relative(&config.obj)),
            cc: Some(config.cc.clone()),
            exe: Some(config.exe.clone()),
            libs: (!config.libs.is_empty()).then(|| config.libs.clone()),
            link: (!config.link_flags.is_empty()).then(|| config.link_flags.clone()),
            incl: (!config.include_dirs.is_empty())
                .then(|| config.include_dirs.iter().map(|d| relative(d)).collect()),
        }
    }
}
