//! Command-line interface implementation for msdk.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};

use crate::commands::Command;

/// Command-line arguments structure for msdk.
#[derive(Parser, Debug)]
#[command(name = "msdk", author, version, about = "CLI tool for MaximSDK project management", long_about = None)]
pub struct Args {
    /// Only print errors and the output of failing tools
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 (after printing help) if no subcommand or a required argument is missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::MissingSubcommand
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            }
            _ => e.exit(),
        },
    }
}
