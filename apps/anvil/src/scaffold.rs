//! Project scaffolding for `anvil init`
//!
//! Creates the project directory layout, initializes a git repository with
//! a matching `.gitignore`, generates a `.clangd` so editors pick up the
//! same dialect flags the build uses, and writes the project manifest.

use anvil_config::{BuildConfig, Manifest};
use anvil_errors::Error;
use anvil_events::{EventEmitter, EventSender};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;

const CLANGD_HEADER: &str = "CompileFlags:\n  Add: [\n    -Wall,\n    -Wpedantic,\n";

const CLANGD_FOOTER: &str = r"  ]
---
If:
  PathMatch: .*\.[ch]
CompileFlags:
  Add: [
    -xc,
    -std=c11,
  ]
---
If:
  PathMatch: .*\.[ch]pp
CompileFlags:
  Add: [
    -xc++,
    -std=c++17,
  ]
";

/// Create a project skeleton for the resolved configuration.
///
/// With `replace` set, an existing project directory is removed first.
/// The git step is best-effort; a missing `git` only produces a warning.
pub async fn init_project(
    config: &BuildConfig,
    project: &Path,
    replace: bool,
    events: &EventSender,
) -> Result<(), Error> {
    if replace && project.exists() {
        events.emit_warning("Replacing old project!");
        fs::remove_dir_all(project)
            .await
            .map_err(|e| Error::io_with_path(&e, project))?;
    }

    create_dir(project, events).await?;
    create_dir(&config.root, events).await?;

    events.emit_debug("* git init");
    if git_init(&config.root).await {
        write_gitignore(config, events).await?;
    } else {
        events.emit_warning("git init failed; skipping .gitignore");
    }

    create_dir(&config.src, events).await?;
    create_dir(&config.bin, events).await?;
    create_dir(&config.obj, events).await?;
    for dir in &config.include_dirs {
        create_dir(dir, events).await?;
    }

    write_clangd(config, events).await?;

    let manifest_path = Manifest::path_in(project);
    events.emit_debug(format!("* {}", manifest_path.display()));
    Manifest::from_config(config)
        .save_to_file(&manifest_path)
        .await?;

    Ok(())
}

async fn create_dir(path: &Path, events: &EventSender) -> Result<(), Error> {
    events.emit_debug(format!("* {}", path.display()));
    fs::create_dir_all(path)
        .await
        .map_err(|e| Error::io_with_path(&e, path))
}

async fn git_init(root: &Path) -> bool {
    Command::new("git")
        .arg("init")
        .arg(".")
        .current_dir(root)
        .stdout(Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Ignore the build output directories, when they are distinct from the
/// root. An existing .gitignore is left alone.
async fn write_gitignore(config: &BuildConfig, events: &EventSender) -> Result<(), Error> {
    let path = config.root.join(".gitignore");
    if path.exists() {
        return Ok(());
    }
    events.emit_debug(format!("* {}", path.display()));

    let mut contents = String::from("# generated by anvil init\n");
    for dir in [&config.bin, &config.obj] {
        if *dir != config.root {
            let rel = dir.strip_prefix(&config.root).unwrap_or(dir);
            let line = rel.display().to_string().replace('\\', "/");
            if !contents.contains(&format!("{line}\n")) {
                contents.push_str(&line);
                contents.push('\n');
            }
        }
    }

    fs::write(&path, contents)
        .await
        .map_err(|e| Error::io_with_path(&e, path))
}

/// Generate a .clangd mirroring the build's warning, include, and dialect
/// flags. Unlike .gitignore this is regenerated on every init.
async fn write_clangd(config: &BuildConfig, events: &EventSender) -> Result<(), Error> {
    let path = config.root.join(".clangd");
    events.emit_debug(format!("* {}", path.display()));

    let mut contents = String::from("# generated by anvil init\n");
    contents.push_str(CLANGD_HEADER);
    for dir in &config.include_dirs {
        let rel = relative_from(dir, &config.src);
        contents.push_str(&format!(
            "    -I{},\n",
            rel.display().to_string().replace('\\', "/")
        ));
    }
    contents.push_str(CLANGD_FOOTER);

    fs::write(&path, contents)
        .await
        .map_err(|e| Error::io_with_path(&e, path))
}

/// Express `path` relative to `base`, climbing with `..` as needed
fn relative_from(path: &Path, base: &Path) -> PathBuf {
    let mut up = PathBuf::new();
    let mut current = base;
    loop {
        if let Ok(rest) = path.strip_prefix(current) {
            return up.join(rest);
        }
        match current.parent() {
            Some(parent) => {
                up.push("..");
                current = parent;
            }
            None => return path.to_path_buf(),
        }
    }
}
