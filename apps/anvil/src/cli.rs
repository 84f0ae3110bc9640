//! Command line interface definition

use anvil_config::Layer;
use anvil_types::ColorChoice;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// anvil - minimal build orchestrator for C/C++ projects
#[derive(Parser)]
#[command(name = "anvil")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Minimal build orchestrator for C/C++ projects")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Build the project executable
    #[command(alias = "b")]
    Build {
        /// Project directory containing the manifest (defaults to ".")
        project: Option<PathBuf>,

        #[command(flatten)]
        overrides: BuildOverrides,
    },

    /// Scaffold a new project and write its manifest
    ///
    /// With --clean, an existing project directory is replaced.
    Init {
        /// Project directory to create (defaults to ".")
        project: Option<PathBuf>,

        #[command(flatten)]
        overrides: BuildOverrides,
    },

    /// List registered toolchains and their availability
    #[command(alias = "tc")]
    Toolchains,
}

/// Manifest overrides, the highest-precedence configuration layer
#[derive(Parser, Default)]
pub struct BuildOverrides {
    /// Build root, the working directory for toolchain invocations
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Source directory, relative to the root
    #[arg(long, value_name = "DIR")]
    pub src: Option<PathBuf>,

    /// Executable output directory, relative to the root
    #[arg(long, value_name = "DIR")]
    pub bin: Option<PathBuf>,

    /// Object output directory, relative to the root
    #[arg(long, value_name = "DIR")]
    pub obj: Option<PathBuf>,

    /// Toolchain to compile with (gcc, clang, cl)
    #[arg(long, value_name = "NAME")]
    pub cc: Option<String>,

    /// Executable name, without platform suffix
    #[arg(long, value_name = "NAME")]
    pub exe: Option<String>,

    /// Libraries to link against
    #[arg(long = "lib", value_name = "LIB", value_delimiter = ',')]
    pub libs: Vec<String>,

    /// Raw flags passed through to the linker
    #[arg(long = "link", value_name = "FLAG", value_delimiter = ',')]
    pub link: Vec<String>,

    /// Include directories, relative to the root
    #[arg(long = "incl", value_name = "DIR", value_delimiter = ',')]
    pub incl: Vec<PathBuf>,

    /// Remove stale objects before compiling
    #[arg(long)]
    pub clean: bool,

    /// Build with debug flags instead of optimized ones
    #[arg(long)]
    pub debug: bool,

    /// Report the commands instead of executing them
    #[arg(long)]
    pub dry_run: bool,
}

impl BuildOverrides {
    /// Convert the CLI flags into a configuration layer
    #[must_use]
    pub fn into_layer(self) -> Layer {
        Layer {
            root: self.root,
            src: self.src,
            bin: self.bin,
            obj: self.obj,
            cc: self.cc,
            exe: self.exe,
            libs: (!self.libs.is_empty()).then_some(self.libs),
            link: (!self.link.is_empty()).then_some(self.link),
            incl: (!self.incl.is_empty()).then_some(self.incl),
            clean: self.clean,
            debug: self.debug,
            dry_run: self.dry_run,
        }
    }
}
