//! msdk's main application entry point.
//! Parses the command line, sets up logging and the console, and dispatches
//! to the requested subcommand.

use msdk::{
    cli::{get_args, Args},
    commands::Context,
    console::Console,
    error::{default_error_handler, Result},
    logger::init_logger,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Runs the selected subcommand from the current working directory.
fn run(args: Args) -> Result<()> {
    let console = Console::new(args.quiet);
    let cwd = std::env::current_dir()?;
    log::debug!("Running {:?} in {}", args.command, cwd.display());

    let context = Context::new(console, cwd);
    args.command.execute(&context)
}
