//! Recording process runner for invocation-count assertions.

use std::io;
use std::sync::Mutex;

use crate::util::process::{ToolInvocation, ToolOutput, ToolRunner};

/// What the fake runner should do for every invocation.
#[derive(Debug, Clone)]
pub enum RunnerScript {
    /// Exit 0 with no output.
    Succeed,
    /// Fail to spawn, as if the binary were missing or unreadable.
    FailSpawn(String),
    /// Run but exit with the given code and stderr text.
    Exit(i32, String),
}

/// A [`ToolRunner`] that records every invocation and never spawns
/// anything.
pub struct RecordingRunner {
    script: RunnerScript,
    calls: Mutex<Vec<ToolInvocation>>,
}

impl RecordingRunner {
    pub fn new(script: RunnerScript) -> Self {
        RecordingRunner {
            script,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Number of invocations attempted so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Snapshot of all recorded invocations.
    pub fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.lock().unwrap().clone()
    }
}

impl ToolRunner for RecordingRunner {
    fn run(&self, invocation: &ToolInvocation) -> io::Result<ToolOutput> {
        self.calls.lock().unwrap().push(invocation.clone());

        match &self.script {
            RunnerScript::Succeed => Ok(ToolOutput {
                code: Some(0),
                stdout: Vec::new(),
                stderr: Vec::new(),
            }),
            RunnerScript::FailSpawn(message) => {
                Err(io::Error::new(io::ErrorKind::NotFound, message.clone()))
            }
            RunnerScript::Exit(code, stderr) => Ok(ToolOutput {
                code: Some(*code),
                stdout: Vec::new(),
                stderr: stderr.as_bytes().to_vec(),
            }),
        }
    }
}
