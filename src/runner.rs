//! Execution of trusted external commands (make, git, gdb).
//!
//! Output is streamed line by line while the child runs: one reader thread
//! per pipe, both joined before the exit status is inspected, so neither
//! pipe can fill up and stall the child.

use std::env;
use std::ffi::{OsStr, OsString};
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use log::debug;

use crate::console::OutputSink;
use crate::error::{Error, Result};

/// An external command plus the environment tweaks it runs with.
#[derive(Debug, Clone)]
pub struct TrustedCommand {
    program: OsString,
    args: Vec<OsString>,
    extra_path: Vec<PathBuf>,
    current_dir: Option<PathBuf>,
}

impl TrustedCommand {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            extra_path: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Adds a directory in front of `PATH`. Earlier calls take priority over later ones.
    pub fn prepend_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extra_path.push(dir.into());
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// The command line as shown in messages.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Builds a `PATH` value with `extra` in front of `current`, keeping their order.
pub fn build_search_path(extra: &[PathBuf], current: Option<&OsStr>) -> Result<OsString> {
    let existing = current.map(|p| env::split_paths(p).collect::<Vec<_>>()).unwrap_or_default();
    env::join_paths(extra.iter().cloned().chain(existing))
        .map_err(|e| Error::IoError(io::Error::new(io::ErrorKind::InvalidInput, e)))
}

/// Runs [`TrustedCommand`]s, forwarding their output to an [`OutputSink`].
pub struct CommandRunner<S: OutputSink> {
    sink: S,
}

impl<S: OutputSink> CommandRunner<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Runs the command to completion.
    ///
    /// # Errors
    /// * `Error::MissingTool` if the program cannot be started because it does not exist
    /// * `Error::CommandFailed` if it exits unsuccessfully
    pub fn run(&self, command: &TrustedCommand) -> Result<()> {
        debug!("Running '{}'", command.display());

        let mut process = Command::new(&command.program);
        process.args(&command.args).stdout(Stdio::piped()).stderr(Stdio::piped());
        if !command.extra_path.is_empty() {
            let path = build_search_path(&command.extra_path, env::var_os("PATH").as_deref())?;
            process.env("PATH", path);
        }
        if let Some(dir) = &command.current_dir {
            process.current_dir(dir);
        }

        let mut child = process.spawn().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::MissingTool {
                tool: command.program.to_string_lossy().into_owned(),
                hint: Some("make sure it is installed and on your PATH".to_string()),
            },
            _ => Error::IoError(e),
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let sink = &self.sink;

        let (out_result, err_result) = thread::scope(|scope| {
            let out = scope.spawn(move || forward_lines(stdout, |line| sink.stdout_line(line)));
            let err = scope.spawn(move || forward_lines(stderr, |line| sink.stderr_line(line)));
            (join_reader(out), join_reader(err))
        });

        let status = child.wait()?;
        out_result?;
        err_result?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::CommandFailed { command: command.display(), code: status.code() })
        }
    }
}

fn forward_lines<R: Read>(pipe: Option<R>, mut emit: impl FnMut(&str)) -> io::Result<()> {
    let Some(pipe) = pipe else {
        return Ok(());
    };
    let mut reader = BufReader::new(pipe);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        emit(line.trim_end_matches(['\n', '\r']));
    }
}

fn join_reader(handle: thread::ScopedJoinHandle<'_, io::Result<()>>) -> io::Result<()> {
    handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::new(io::ErrorKind::Other, "output reader panicked")))
}
