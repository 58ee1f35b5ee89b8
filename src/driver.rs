//! Generation driver: resolve, locate, gate, invoke, post-process.
//!
//! One driver call is one strict pass with no retries and no resumption.
//! The toolchain handle it opens is private to the call, so independent
//! build modules can run drivers in parallel threads without sharing any
//! mutable state.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::capability::{CapabilityGate, Operation};
use crate::toolchain::ToolchainHandle;
use crate::util::fs;
use crate::util::process::{SystemRunner, ToolRunner};

/// Immutable parameters for one generation invocation.
///
/// Constructed fresh per host-adapter call and passed down the call chain;
/// there is no ambient mutable configuration.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Absolute paths of the `.keel` sources to process.
    pub sources: BTreeSet<PathBuf>,
    /// Ordered toolchain search path. Also handed to the tool so it
    /// resolves dependency interfaces from the same entries.
    pub search_path: Vec<PathBuf>,
    /// Where the tool writes its outputs.
    pub output_dir: PathBuf,
    /// Extra `--key value` options forwarded to the tool.
    pub options: Vec<(String, String)>,
}

/// Result of one generation invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The tool ran; these are the files it produced.
    Generated { outputs: Vec<PathBuf> },
    /// The operation was deliberately not attempted. This is a success.
    Skipped { reason: String },
}

impl GenerationOutcome {
    /// Files produced by this invocation; empty when skipped.
    pub fn outputs(&self) -> &[PathBuf] {
        match self {
            GenerationOutcome::Generated { outputs } => outputs,
            GenerationOutcome::Skipped { .. } => &[],
        }
    }

    /// Whether the invocation was a deliberate no-op.
    pub fn is_skipped(&self) -> bool {
        matches!(self, GenerationOutcome::Skipped { .. })
    }
}

/// Drives one toolchain operation from located version to post-processed
/// outputs.
pub struct GenerationDriver {
    gate: CapabilityGate,
    runner: Arc<dyn ToolRunner>,
}

impl Default for GenerationDriver {
    fn default() -> Self {
        GenerationDriver {
            gate: CapabilityGate::default(),
            runner: Arc::new(SystemRunner),
        }
    }
}

impl GenerationDriver {
    /// Driver with the stock capability table and the system process
    /// runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the capability table.
    pub fn with_gate(mut self, gate: CapabilityGate) -> Self {
        self.gate = gate;
        self
    }

    /// Replace the process runner (tests use a recording fake).
    pub fn with_runner(mut self, runner: Arc<dyn ToolRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Run one operation to completion.
    ///
    /// Toolchain failures propagate as [`crate::ToolchainError`] values
    /// inside the returned error; a version below the operation's minimum
    /// is a logged skip, not an error.
    pub fn run(
        &self,
        operation: Operation,
        request: &GenerationRequest,
    ) -> Result<GenerationOutcome> {
        if request.sources.is_empty() {
            debug!("{}: no sources, nothing to generate", operation);
            return Ok(GenerationOutcome::Skipped {
                reason: "no sources".to_string(),
            });
        }

        debug!(
            "{}: toolchain search path: {:?}",
            operation, request.search_path
        );

        let handle = ToolchainHandle::open(&request.search_path, self.runner.clone())?;
        let version = handle.version().clone();

        if !self.gate.supports(operation, &version) {
            let reason = self.gate.explain(operation, &version);
            warn!("skipping {}: {}", operation, reason);
            return Ok(GenerationOutcome::Skipped { reason });
        }

        fs::ensure_dir(&request.output_dir)?;

        let mut option_keys = vec!["out-dir", "search-path"];
        option_keys.extend(request.options.iter().map(|(key, _)| key.as_str()));

        let joined_search_path = std::env::join_paths(&request.search_path)
            .context("failed to join toolchain search path")?;

        let mut bound = handle
            .bind(operation.tool(), operation.command(), &option_keys)?
            .option("out-dir", &request.output_dir)
            .option("search-path", &joined_search_path);
        for (key, value) in &request.options {
            bound = bound.option(key, value);
        }
        bound = bound.args(&request.sources);

        bound.run()?;

        let outputs = fs::collect_outputs(&request.output_dir)?;

        if operation.is_stub_generation() {
            fs::reset_modified_times(&outputs)?;
            for output in &outputs {
                debug!("generated stub: {}", output.display());
            }
            info!(
                "{}: generated {} stub(s) in {}",
                operation,
                outputs.len(),
                request.output_dir.display()
            );
        } else {
            info!(
                "{}: generated documentation in {}",
                operation,
                request.output_dir.display()
            );
        }

        Ok(GenerationOutcome::Generated { outputs })
    }
}
