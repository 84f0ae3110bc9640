#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for the anvil build orchestrator
//!
//! This crate provides the shared vocabulary used throughout the system:
//! source language classification and terminal color selection.

use serde::{Deserialize, Serialize};

/// Source languages the orchestrator compiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Cpp,
}

impl Language {
    /// Classify a file extension (without the leading dot, case-sensitive).
    ///
    /// Only `c` and `cpp` are compilable; everything else is skipped by
    /// source discovery.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "c" => Some(Self::C),
            "cpp" => Some(Self::Cpp),
            _ => None,
        }
    }

    /// The dialect tag used to select language flags in a flagset
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::C => "c",
            Self::Cpp => "cpp",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::C => write!(f, "c"),
            Self::Cpp => write!(f, "cpp"),
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    Auto,
    Never,
}

// Implement clap::ValueEnum for ColorChoice
impl clap::ValueEnum for ColorChoice {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Always, Self::Auto, Self::Never]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Always => clap::builder::PossibleValue::new("always"),
            Self::Auto => clap::builder::PossibleValue::new("auto"),
            Self::Never => clap::builder::PossibleValue::new("never"),
        })
    }
}

impl Default for ColorChoice {
    fn default() -> Self {
        Self::Auto
    }
}

/// Append the platform executable suffix to a base name.
///
/// Anything after the first `.` in the provided name is dropped first, so
/// `my-app.old` and `my-app` both yield `my-app` (plus `.exe` on Windows).
#[must_use]
pub fn executable_name(name: &str) -> String {
    let base = name.split('.').next().unwrap_or(name);
    if cfg!(windows) {
        format!("{base}.exe")
    } else {
        base.to_string()
    }
}
