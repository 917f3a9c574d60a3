//! msdk manages MaximSDK firmware projects.
//! It scaffolds projects from SDK examples and wraps make, GDB, OpenOCD and
//! git behind a small project-lifecycle CLI.

/// Command-line interface module for the msdk application
pub mod cli;

/// The `init`, `build`, `clean`, `clean-periph`, `flash` and `run` subcommands
pub mod commands;

/// Project configuration (`msdk-proj.toml`) derivation and loading
pub mod config;

/// Styled terminal output and the sink for external command output
pub mod console;

/// Common constants: file names, defaults, exit codes
pub mod constants;

/// SDK root, toolchain and OpenOCD discovery
pub mod environment;

/// Error types and handling for the msdk application
pub mod error;

/// Project generation pipeline with rollback
pub mod generate;

/// Logger setup
pub mod logger;

/// Running trusted external commands with streamed output
pub mod runner;

/// Copying SDK examples into a project
pub mod template;

/// Path, name and SDK layout checks
pub mod validation;

/// Git repository bootstrap and `.gitignore` merging
pub mod vcs;
