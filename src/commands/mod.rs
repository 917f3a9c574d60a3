//! The `msdk` subcommands.
//!
//! Each variant of [`Command`] is one CLI verb: clap derives its arguments
//! (and aliases) and [`Command::execute`] runs it against a [`Context`].

use std::path::PathBuf;

use clap::Subcommand;

use crate::console::Console;
use crate::error::Result;
use crate::runner::CommandRunner;

pub mod build;
pub mod clean;
pub mod flash;
pub mod init;
pub mod run;

/// Per-invocation state shared by all commands.
pub struct Context {
    pub console: Console,
    pub runner: CommandRunner<Console>,
    /// Working directory the tool was started in
    pub cwd: PathBuf,
}

impl Context {
    pub fn new(console: Console, cwd: PathBuf) -> Self {
        Self { console, runner: CommandRunner::new(console), cwd }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize new MSDK project
    #[command(visible_alias = "new")]
    Init(init::InitArgs),

    /// Build MSDK project
    #[command(visible_alias = "b")]
    Build(build::BuildArgs),

    /// Clean build artifacts
    #[command(visible_alias = "c")]
    Clean,

    /// Clean peripheral build artifacts
    #[command(visible_alias = "cp")]
    CleanPeriph,

    /// Build & flash project to device
    #[command(visible_alias = "f")]
    Flash(flash::FlashArgs),

    /// Build, flash, and run project on device
    #[command(visible_alias = "r")]
    Run(run::RunArgs),
}

impl Command {
    pub fn execute(self, context: &Context) -> Result<()> {
        match self {
            Command::Init(args) => init::execute(args, context),
            Command::Build(args) => build::execute(args, context),
            Command::Clean => clean::clean(context),
            Command::CleanPeriph => clean::clean_periph(context),
            Command::Flash(args) => flash::execute(args, context),
            Command::Run(args) => run::execute(args, context),
        }
    }
}
