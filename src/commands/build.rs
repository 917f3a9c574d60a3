//! `msdk build` -- build a project with the SDK's GCC toolchain.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use clap::Args;
use log::debug;

use crate::commands::Context;
use crate::console::OutputSink;
use crate::environment::{find_toolchain, resolve_sdk_root};
use crate::error::Result;
use crate::runner::{CommandRunner, TrustedCommand};
use crate::validation::{ensure_conventional_name, ensure_project_dir};

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Output .elf name (default: the project name from project.mk)
    #[arg(short, long, value_name = "OUT")]
    pub out: Option<String>,
}

pub fn execute(args: BuildArgs, context: &Context) -> Result<()> {
    ensure_project_dir(&context.cwd)?;
    let sdk_root = resolve_sdk_root()?;
    build_project(&context.runner, &context.cwd, &sdk_root, args.out.as_deref())
}

/// Runs `make` in `project_dir` with the newest toolchain first on `PATH`.
///
/// `project_name` overrides `PROJECT=`; `None` or `"."` leaves it to `project.mk`.
pub fn build_project<S: OutputSink>(
    runner: &CommandRunner<S>,
    project_dir: &Path,
    sdk_root: &Path,
    project_name: Option<&str>,
) -> Result<()> {
    let project_name = project_name.map(str::trim).filter(|name| !name.is_empty() && *name != ".");
    if let Some(name) = project_name {
        ensure_conventional_name(name, false)?;
    }

    let toolchain_bin = find_toolchain(sdk_root)?;
    let mut command = TrustedCommand::new("make")
        .args(["-r", "-j", "8", "--output-sync=target", "--no-print-directory"])
        .prepend_path(toolchain_bin)
        .current_dir(project_dir);
    if let Some(name) = project_name {
        command = command.arg(format!("PROJECT={name}"));
    }
    runner.run(&command)
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

/// Builds the project and reports whether `program_file` was (re)written.
pub fn build_and_check_modified<S: OutputSink>(
    runner: &CommandRunner<S>,
    project_dir: &Path,
    sdk_root: &Path,
    program_file: &Path,
) -> Result<bool> {
    let before = modified_time(program_file);
    build_project(runner, project_dir, sdk_root, None)?;
    let after = modified_time(program_file);
    debug!("Program file mtime before: {:?}, after: {:?}", before, after);

    Ok(match (before, after) {
        (_, None) => false,
        (None, Some(_)) => true,
        (Some(before), Some(after)) => after > before,
    })
}
