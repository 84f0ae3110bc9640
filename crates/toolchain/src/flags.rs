//! Command-line flag templates per toolchain family
//!
//! Each template is a pure function from one string argument to one
//! command-line fragment; no template depends on build state. Command
//! assembly follows the MSVC positional ordering, which GCC-like toolchains
//! tolerate since their grammar is position-insensitive.

use std::path::Path;

/// A command-line fragment with exactly one `{}` substitution slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagTemplate(&'static str);

impl FlagTemplate {
    /// Fill the slot with the given argument
    #[must_use]
    pub fn fill(&self, arg: &str) -> String {
        self.0.replacen("{}", arg, 1)
    }
}

/// Flag templates for one toolchain family
#[derive(Debug, Clone, Copy)]
pub struct Flagset {
    /// Flags passed on every invocation
    pub general: &'static str,

    /// Produce an executable with the given name
    /// e.g. `/Fe{}` for cl.exe
    pub exe_out: FlagTemplate,

    /// Produce an object file with the given name
    /// e.g. `-c -o {}` for gcc
    pub obj_out: FlagTemplate,

    /// Object file extension, without the dot
    /// e.g. `obj` for cl.exe
    pub obj_ext: &'static str,

    /// Add an include directory
    pub include: FlagTemplate,

    /// Link against a library
    /// e.g. `{}.lib` for cl.exe, `-l{}` for gcc
    pub lib: FlagTemplate,

    /// Pass one raw argument through to the linker. Only the GNU-like
    /// grammar needs an escape here; cl.exe takes linker args verbatim.
    pub linker_arg: FlagTemplate,

    /// Dialect flags for C and C++ respectively
    pub c: &'static str,
    pub cpp: &'static str,

    /// Flag bundles for optimized and debug builds, mutually exclusive
    pub optimized: &'static str,
    pub debug: &'static str,
}

impl Flagset {
    /// Object file name for a source file stem, extension stripped at the
    /// first `.`
    #[must_use]
    pub fn object_file_name(&self, stem: &str) -> String {
        let base = stem.split('.').next().unwrap_or(stem);
        format!("{base}.{}", self.obj_ext)
    }

    /// Dialect flags for a language tag. Unknown tags yield an empty
    /// fragment; discovery only ever produces `c` and `cpp`.
    #[must_use]
    pub fn language_flags(&self, lang: &str) -> &'static str {
        match lang {
            "c" => self.c,
            "cpp" => self.cpp,
            _ => "",
        }
    }

    /// Command line for compiling one source file to an object file
    #[must_use]
    pub fn object_command(
        &self,
        command: &str,
        source: &Path,
        output: &Path,
        include_dirs: &[std::path::PathBuf],
        lang: &str,
        debug: bool,
    ) -> String {
        let mut parts = vec![
            command.to_string(),
            self.general.to_string(),
            self.mode_flags(debug).to_string(),
            self.language_flags(lang).to_string(),
            self.obj_out.fill(&output.display().to_string()),
        ];
        parts.extend(
            include_dirs
                .iter()
                .map(|dir| self.include.fill(&dir.display().to_string())),
        );
        parts.push(source.display().to_string());
        join_fragments(parts)
    }

    /// Command line for linking object files into an executable
    #[must_use]
    pub fn executable_command(
        &self,
        command: &str,
        objects: &[std::path::PathBuf],
        output: &Path,
        libs: &[String],
        link_flags: &[String],
        debug: bool,
    ) -> String {
        let mut parts = vec![
            command.to_string(),
            self.general.to_string(),
            self.mode_flags(debug).to_string(),
            self.exe_out.fill(&output.display().to_string()),
        ];
        parts.extend(objects.iter().map(|obj| obj.display().to_string()));
        parts.extend(libs.iter().map(|lib| self.lib.fill(lib)));
        parts.extend(link_flags.iter().map(|flag| self.linker_arg.fill(flag)));
        join_fragments(parts)
    }

    fn mode_flags(&self, debug: bool) -> &'static str {
        if debug {
            self.debug
        } else {
            self.optimized
        }
    }
}

fn join_fragments(parts: Vec<String>) -> String {
    let fragments: Vec<String> = parts.into_iter().filter(|p| !p.is_empty()).collect();
    fragments.join(" ")
}

/// Flags for toolchains with a GCC-like grammar (gcc and clang)
pub const GNULIKE_FLAGS: Flagset = Flagset {
    general: "-D_CRT_SECURE_NO_WARNINGS",
    exe_out: FlagTemplate("-o {}"),
    obj_out: FlagTemplate("-c -o {}"),
    obj_ext: "o",
    include: FlagTemplate("-I{}"),
    lib: FlagTemplate("-l{}"),
    linker_arg: FlagTemplate("-Xlinker {}"),
    c: "-xc -std=c11",
    cpp: "-xc++ -std=c++17",
    optimized: "-DNDEBUG -O3 -flto",
    debug: "-DDEBUG -O0 -Wall -Wpedantic -Wextra",
};

/// Flags for cl.exe
pub const MSVC_FLAGS: Flagset = Flagset {
    general: "/nologo /D_CRT_SECURE_NO_WARNINGS",
    exe_out: FlagTemplate("/Fe{}"),
    obj_out: FlagTemplate("/Fo{}"),
    obj_ext: "obj",
    include: FlagTemplate("/I{}"),
    lib: FlagTemplate("{}.lib"),
    linker_arg: FlagTemplate("{}"),
    c: "/Tc /std:c11",
    cpp: "/Tp /std:c++17",
    optimized: "/DNDEBUG /Ot",
    debug: "/DDEBUG /Od /Wall",
};
