//! Error handling for the msdk application.
//! Defines custom error types and results used throughout the application.

use std::error::Error as _;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use dialoguer::Confirm;
use thiserror::Error;

use crate::console::Console;
use crate::constants::{EXIT_FAILURE, EXIT_INTERNAL};
use crate::validation::PathType;

/// Custom error types for msdk operations.
///
/// Variants up to `IoError` describe failures caused by the user's input or
/// environment. The remaining variants mean the tool itself broke and are
/// reported with a distinct exit code.
#[derive(Error, Debug)]
pub enum Error {
    /// A required environment variable or configuration file is absent
    #[error("{what}")]
    ConfigMissing { what: String, hint: Option<String> },

    /// A filesystem path that should exist does not
    #[error("{description} not found: '{}'", .path.display())]
    NotFound { description: String, path: PathBuf, hint: Option<String> },

    /// A filesystem path exists but is a file where a directory was expected, or vice versa
    #[error("{description} is not a {expected}: '{}'", .path.display())]
    WrongType {
        description: String,
        path: PathBuf,
        expected: PathType,
        hint: Option<String>,
    },

    #[error("invalid {kind} name: '{name}'")]
    InvalidName { name: String, kind: &'static str },

    /// Idempotency guard: the project (or part of it) already exists
    #[error("cannot initialize project: '{}' already exists", .path.display())]
    AlreadyInitialized { path: PathBuf },

    /// Existing state is incompatible with the requested operation
    #[error("{message}")]
    Conflict { message: String, hint: Option<String> },

    /// A required external binary could not be located
    #[error("{tool} not found")]
    MissingTool { tool: String, hint: Option<String> },

    #[error("invalid project configuration '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Input or configuration is well-formed but incomplete or unacceptable
    #[error("{message}")]
    Validation { message: String, hint: Option<String> },

    /// An external process exited unsuccessfully
    #[error("command '{command}' failed {}", describe_exit(.code))]
    CommandFailed { command: String, code: Option<i32> },

    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    #[error("malformed JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to serialize project configuration: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("failed to walk directory tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("interactive prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("with exit code {code}"),
        None => "after being terminated by a signal".to_string(),
    }
}

/// Convenience type alias for Results with msdk's Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a [`Error::Validation`] without a tip.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation { message: message.into(), hint: None }
    }

    /// Remediation tip shown under the error message.
    pub fn hint(&self) -> Option<String> {
        match self {
            Error::ConfigMissing { hint, .. }
            | Error::NotFound { hint, .. }
            | Error::WrongType { hint, .. }
            | Error::Conflict { hint, .. }
            | Error::MissingTool { hint, .. }
            | Error::Validation { hint, .. } => hint.clone(),
            Error::InvalidName { .. } => Some(
                "names must start with a letter and contain only letters, digits, '-' or '_'"
                    .to_string(),
            ),
            Error::AlreadyInitialized { .. } => {
                Some("this directory is already an MSDK project".to_string())
            }
            Error::Parse { .. } => Some(
                "fix the TOML syntax, or delete 'msdk-proj.toml' and run 'msdk init . --allow-cwd' to regenerate it"
                    .to_string(),
            ),
            _ => None,
        }
    }

    /// Appends a line to the tip of variants that carry one. Other variants are returned as-is.
    pub fn with_hint(mut self, extra: impl AsRef<str>) -> Self {
        let extra = extra.as_ref();
        if let Error::ConfigMissing { hint, .. }
        | Error::NotFound { hint, .. }
        | Error::WrongType { hint, .. }
        | Error::Conflict { hint, .. }
        | Error::MissingTool { hint, .. }
        | Error::Validation { hint, .. } = &mut self
        {
            *hint = Some(match hint.take() {
                Some(existing) => format!("{existing}\n  {extra}"),
                None => extra.to_string(),
            });
        }
        self
    }

    /// True when the error means the tool broke rather than the input being wrong.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Error::Json(_) | Error::TomlSerialize(_) | Error::Walk(_) | Error::Prompt(_)
        )
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_internal() {
            EXIT_INTERNAL
        } else {
            EXIT_FAILURE
        }
    }
}

/// Default error handler that prints the error and exits the program.
///
/// Expected failures print the message and tip and exit with status 1.
/// Internal failures exit with status 2, offering to dump the full error
/// chain first when attached to a terminal.
pub fn default_error_handler(err: Error) -> ! {
    let console = Console::new(false);

    if err.is_internal() {
        console.error(format!("unexpected internal error: {err}"));
        if io::stdin().is_terminal() && confirm_details().unwrap_or(false) {
            eprintln!("{err:#?}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
        }
    } else {
        console.error(&err);
        if let Some(hint) = err.hint() {
            console.tip(hint);
        }
    }

    std::process::exit(err.exit_code());
}

fn confirm_details() -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt("This is a bug in msdk. Show the full error details?")
        .default(false)
        .interact()?)
}
