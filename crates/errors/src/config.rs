//! Configuration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("project manifest not found: {path}")]
    ManifestNotFound { path: String },

    #[error("parse error: {message}")]
    ParseError { message: String },

    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("unknown toolchain: {name}")]
    UnknownToolchain { name: String },

    #[error("directory does not exist: {path}")]
    MissingDirectory { path: String },

    #[error("failed to write manifest to {path}: {error}")]
    WriteError { path: String, error: String },

    #[error("failed to serialize manifest: {error}")]
    SerializeError { error: String },
}

impl UserFacingError for ConfigError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ManifestNotFound { .. } => {
                Some("Run `anvil init` to create a project manifest.")
            }
            Self::MissingField { field } => Some(match field.as_str() {
                "exe" => "Set the executable name in anvil.toml or via --exe.",
                "cc" => "Select a toolchain in anvil.toml or via --cc.",
                _ => "Add the missing configuration field noted in the error message.",
            }),
            Self::UnknownToolchain { .. } => {
                Some("Supported toolchains are gcc, clang, and cl.")
            }
            Self::MissingDirectory { .. } => {
                Some("Check the root/src paths in the project manifest.")
            }
            Self::ParseError { .. } => Some("Fix the manifest value and retry the command."),
            Self::WriteError { .. } => Some("Ensure the manifest path is writable and retry."),
            _ => None,
        }
    }
}
