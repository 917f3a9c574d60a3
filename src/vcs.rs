//! Git bootstrap for freshly generated projects.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::console::OutputSink;
use crate::constants::{GIT_DIR, GIT_IGNORE_FILE, IDE_DIR, IGNORE_HEADER, IGNORE_PATTERNS};
use crate::environment::find_program;
use crate::error::{Error, Result};
use crate::runner::{CommandRunner, TrustedCommand};

/// Runs `git init` in `dir`.
///
/// # Errors
/// * See [`check_repository`]
/// * `Error::CommandFailed` if `git init` fails
pub fn init_repository<S: OutputSink>(
    dir: &Path,
    reinit_allowed: bool,
    runner: &CommandRunner<S>,
) -> Result<()> {
    let git = check_repository(dir, reinit_allowed)?;
    run_git_init(&git, dir, runner)
}

/// Checks that `git init` can run in `dir` without touching it, and returns the `git` executable.
///
/// # Errors
/// * `Error::Conflict` if `.git` is a file, or a directory and `reinit_allowed` is off
/// * `Error::MissingTool` if no `git` executable is on `PATH`
pub fn check_repository(dir: &Path, reinit_allowed: bool) -> Result<PathBuf> {
    let git_dir = dir.join(GIT_DIR);
    if git_dir.is_file() {
        return Err(Error::Conflict {
            message: format!("'{}' exists but is a file, not a directory", git_dir.display()),
            hint: Some("remove or rename it, or pass --no-git".to_string()),
        });
    }
    if git_dir.is_dir() && !reinit_allowed {
        return Err(Error::Conflict {
            message: format!("'{}' is already a git repository", dir.display()),
            hint: Some("pass --no-git to keep it as is, or --allow-cwd to reinitialize".to_string()),
        });
    }

    find_program("git").ok_or_else(|| Error::MissingTool {
        tool: "git".to_string(),
        hint: Some("install git or pass --no-git".to_string()),
    })
}

/// Runs `git init` in `dir` with a `git` found by [`check_repository`].
pub fn run_git_init<S: OutputSink>(git: &Path, dir: &Path, runner: &CommandRunner<S>) -> Result<()> {
    debug!("Initializing git repository in {}", dir.display());
    runner.run(&TrustedCommand::new(git).arg("init").current_dir(dir))
}

/// The block appended to `.gitignore`.
pub fn ignore_block(include_ide_config: bool) -> String {
    let mut block = format!("{IGNORE_HEADER}\n");
    for pattern in IGNORE_PATTERNS {
        block.push_str(pattern);
        block.push('\n');
    }
    if include_ide_config {
        block.push_str(&format!("{IDE_DIR}/\n"));
    }
    block
}

/// Appends the ignore block to `<dir>/.gitignore`, creating it if needed.
///
/// Repeated calls append the block again. A directory named `.gitignore`
/// is left alone.
pub fn write_ignore_file(dir: &Path, include_ide_config: bool) -> Result<()> {
    let path = dir.join(GIT_IGNORE_FILE);
    if path.is_dir() {
        warn!("'{}' is a directory, not writing ignore patterns", path.display());
        return Ok(());
    }

    let mut content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };
    if !content.is_empty() {
        if !content.ends_with('\n') {
            content.push('\n');
        }
        content.push('\n');
    }
    content.push_str(&ignore_block(include_ide_config));

    fs::write(&path, content)?;
    debug!("Wrote {}", path.display());
    Ok(())
}
