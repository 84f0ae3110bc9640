//! Build pipeline error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error("compilation failed: {object}")]
    CompileFailed { object: String },

    #[error("linking failed: {exe}")]
    LinkFailed { exe: String },

    #[error("failed to spawn {command}: {message}")]
    SpawnFailed { command: String, message: String },

    #[error("failed to prepare directory {path}: {message}")]
    DirectoryFailed { path: String, message: String },

    #[error("source discovery failed under {path}: {message}")]
    DiscoveryFailed { path: String, message: String },
}

impl UserFacingError for BuildError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::CompileFailed { .. } | Self::LinkFailed { .. } => {
                Some("Compiler diagnostics were printed above.")
            }
            Self::SpawnFailed { .. } => {
                Some("Check that the selected toolchain is installed and on PATH.")
            }
            _ => None,
        }
    }
}
