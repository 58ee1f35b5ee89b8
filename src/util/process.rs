//! Subprocess execution behind a mockable seam.
//!
//! Every toolchain process goes through [`ToolRunner`], so tests can count
//! and fake invocations without touching the filesystem or spawning
//! anything.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A fully resolved tool invocation: absolute program path plus arguments.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    program: PathBuf,
    args: Vec<String>,
}

impl ToolInvocation {
    /// Create a new invocation for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ToolInvocation {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Display the command for log and error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Captured result of a completed tool process.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Exit code, `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    /// Whether the process exited cleanly.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Describe the exit status for error messages.
    pub fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Executes tool invocations. An `Err` means the process never started;
/// a nonzero exit arrives as `Ok` with a failing [`ToolOutput`].
pub trait ToolRunner: Send + Sync {
    fn run(&self, invocation: &ToolInvocation) -> io::Result<ToolOutput>;
}

/// The production runner: spawns the process and captures its output.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &ToolInvocation) -> io::Result<ToolOutput> {
        let output = Command::new(invocation.get_program())
            .args(invocation.get_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        Ok(ToolOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
