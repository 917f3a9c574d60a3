//! `msdk run` -- build, flash, and run a project on the device.

use clap::Args;

use crate::commands::build::build_and_check_modified;
use crate::commands::flash::flash_device;
use crate::commands::Context;
use crate::config::load_flash_config;
use crate::constants::BUILD_DIR;
use crate::environment::resolve_sdk_root;
use crate::error::Result;
use crate::validation::ensure_project_dir;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Skip build step
    #[arg(long)]
    pub skip_build: bool,

    /// Skip flash step (only run); ignored when the build produced a new binary
    #[arg(long)]
    pub skip_flash: bool,
}

pub fn execute(args: RunArgs, context: &Context) -> Result<()> {
    ensure_project_dir(&context.cwd)?;
    let sdk_root = resolve_sdk_root()?;

    let config = load_flash_config(&context.cwd)?;
    let program_file = context.cwd.join(BUILD_DIR).join(&config.program_file);

    let mut need_flash = !args.skip_flash;
    if !args.skip_build {
        let rebuilt = build_and_check_modified(&context.runner, &context.cwd, &sdk_root, &program_file)?;
        need_flash |= rebuilt;
    }

    if need_flash {
        flash_device(&context.runner, context.console, &context.cwd, &sdk_root, &config, false)?;
    }
    flash_device(&context.runner, context.console, &context.cwd, &sdk_root, &config, true)
}
