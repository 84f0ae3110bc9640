#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Toolchain abstraction for the anvil build orchestrator
//!
//! This crate hides the divergent command-line grammars of the supported
//! C/C++ toolchains behind one interface, so the job orchestrator never
//! branches on toolchain identity. The set of supported grammars is small
//! and deliberately closed: GCC-like (gcc, clang) and MSVC-like (cl).

mod flags;
mod toolchain;

pub use flags::{FlagTemplate, Flagset, GNULIKE_FLAGS, MSVC_FLAGS};
pub use toolchain::{lookup, toolchain_names, Toolchain};
