//! Styled terminal output.
//!
//! The quiet flag is decided once from the command line and carried by value
//! in [`Console`], so every component that prints receives it explicitly.

use std::fmt::Display;

use colored::Colorize;

/// Receives the output of an external command one line at a time.
///
/// Implementations are shared between the stdout and stderr reader threads.
pub trait OutputSink: Sync {
    fn stdout_line(&self, line: &str);
    fn stderr_line(&self, line: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    quiet: bool,
}

impl Console {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Reports a completed step, e.g. "• Initialized project".
    pub fn success(&self, message: impl Display) {
        if !self.quiet {
            println!("{} {message}", "•".bright_green());
        }
    }

    /// Errors are printed regardless of quiet mode.
    pub fn error(&self, message: impl Display) {
        eprintln!("{} {message}", "error:".bright_red().bold());
    }

    pub fn tip(&self, message: impl Display) {
        eprintln!("\n{} {message}", "tip:".bright_green().bold());
    }
}

impl OutputSink for Console {
    fn stdout_line(&self, line: &str) {
        if !self.quiet {
            println!("{line}");
        }
    }

    fn stderr_line(&self, line: &str) {
        eprintln!("{}", line.yellow());
    }
}
