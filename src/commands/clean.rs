//! `msdk clean` and `msdk clean-periph`.

use crate::commands::Context;
use crate::error::Result;
use crate::runner::TrustedCommand;
use crate::validation::ensure_project_dir;

/// Removes the project's build artifacts.
pub fn clean(context: &Context) -> Result<()> {
    ensure_project_dir(&context.cwd)?;
    context.runner.run(&TrustedCommand::new("make").arg("clean").current_dir(&context.cwd))
}

/// Removes the project's build artifacts and the prebuilt peripheral libraries.
pub fn clean_periph(context: &Context) -> Result<()> {
    ensure_project_dir(&context.cwd)?;
    context.runner.run(&TrustedCommand::new("make").arg("distclean").current_dir(&context.cwd))
}
