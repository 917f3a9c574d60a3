//! `msdk flash` -- flash a project to the device through GDB and OpenOCD.

use std::path::Path;

use clap::Args;
use colored::Colorize;

use crate::commands::build::build_project;
use crate::commands::Context;
use crate::config::{load_flash_config, FlashConfig};
use crate::console::{Console, OutputSink};
use crate::constants::{BUILD_DIR, GDB_BINARY};
use crate::environment::{debug_tool_bin, find_toolchain, resolve_sdk_root};
use crate::error::{Error, Result};
use crate::runner::{CommandRunner, TrustedCommand};
use crate::validation::ensure_project_dir;

#[derive(Args, Debug)]
pub struct FlashArgs {
    /// Skip build step, flash existing binary
    #[arg(long)]
    pub skip_build: bool,
}

pub fn execute(args: FlashArgs, context: &Context) -> Result<()> {
    ensure_project_dir(&context.cwd)?;
    let sdk_root = resolve_sdk_root()?;

    if !args.skip_build {
        build_project(&context.runner, &context.cwd, &sdk_root, None)?;
    }

    let config = load_flash_config(&context.cwd)?;
    flash_device(&context.runner, context.console, &context.cwd, &sdk_root, &config, false)
}

/// Whether the device is left halted after flashing or resumed.
fn gdb_function(run: bool) -> &'static str {
    if run {
        "flash_m4_run"
    } else {
        "flash_m4"
    }
}

fn ensure_build_file(path: &Path, kind: &str) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    Err(Error::NotFound {
        description: format!("{kind} file"),
        path: path.to_path_buf(),
        hint: Some("run 'msdk build' first, or flash without --skip-build".to_string()),
    })
}

/// Builds the GDB invocation that flashes (and with `run`, resumes) the device.
pub fn gdb_command(project_dir: &Path, config: &FlashConfig, run: bool) -> TrustedCommand {
    let build_dir = project_dir.join(BUILD_DIR);
    TrustedCommand::new(GDB_BINARY)
        .arg(format!("--cd={}", project_dir.display()))
        .arg(format!("--se={}", build_dir.join(&config.program_file).display()))
        .arg(format!("--symbols={}", build_dir.join(&config.symbol_file).display()))
        .arg(format!("-x={}", config.gdb_script.display()))
        .arg(format!(
            "--ex={} {} {} {}",
            gdb_function(run),
            config.ocd_path.display(),
            config.interface_file,
            config.target_file
        ))
        .arg("--batch")
}

/// Flashes the built program onto the device.
///
/// # Errors
/// * `Error::NotFound` if the program or symbol file has not been built
/// * `Error::CommandFailed` if GDB fails
pub fn flash_device<S: OutputSink>(
    runner: &CommandRunner<S>,
    console: Console,
    project_dir: &Path,
    sdk_root: &Path,
    config: &FlashConfig,
    run: bool,
) -> Result<()> {
    let build_dir = project_dir.join(BUILD_DIR);
    ensure_build_file(&build_dir.join(&config.program_file), "program")?;
    ensure_build_file(&build_dir.join(&config.symbol_file), "symbol")?;

    let command = gdb_command(project_dir, config, run)
        .prepend_path(find_toolchain(sdk_root)?)
        .prepend_path(debug_tool_bin(&config.ocd_path))
        .current_dir(project_dir);

    let action = if run { "Flashing and running" } else { "Flashing" };
    console.success(format!("{action} {}...", config.identity.name.cyan().bold()));
    runner.run(&command)
}
