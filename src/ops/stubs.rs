//! Build-phase entry points for header stub generation.
//!
//! Thin configuration plus delegation: gather sources, build a request,
//! run the driver, and hand the output directory back to the host as a
//! compilable source root so the downstream C compiler finds the stubs.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::capability::Operation;
use crate::driver::{GenerationDriver, GenerationOutcome, GenerationRequest};
use crate::host::{BuildHost, Scope};
use crate::util::fs;

/// File extension of keel interface sources.
pub const SOURCE_EXTENSION: &str = "keel";

/// Configuration for one stub-generation phase.
#[derive(Debug, Clone, Default)]
pub struct StubsConfig {
    /// Directories scanned for `.keel` sources.
    pub source_roots: Vec<PathBuf>,
    /// Ordered toolchain search path, from the build's dependency
    /// resolution at the matching scope.
    pub search_path: Vec<PathBuf>,
    /// Output directory; defaults to `generated/stubs/<scope>` under the
    /// host's base directory.
    pub output_dir: Option<PathBuf>,
    /// Skip this phase entirely.
    pub skip: bool,
}

/// Generate header stubs for the main sources.
pub fn generate_stubs(
    host: &mut dyn BuildHost,
    config: &StubsConfig,
) -> Result<GenerationOutcome> {
    generate_stubs_with(host, config, &GenerationDriver::new())
}

/// Generate header stubs for the test sources.
pub fn generate_test_stubs(
    host: &mut dyn BuildHost,
    config: &StubsConfig,
) -> Result<GenerationOutcome> {
    generate_test_stubs_with(host, config, &GenerationDriver::new())
}

/// [`generate_stubs`] with an explicit driver.
pub fn generate_stubs_with(
    host: &mut dyn BuildHost,
    config: &StubsConfig,
    driver: &GenerationDriver,
) -> Result<GenerationOutcome> {
    run(host, config, Scope::Main, Operation::StubsMain, driver)
}

/// [`generate_test_stubs`] with an explicit driver.
pub fn generate_test_stubs_with(
    host: &mut dyn BuildHost,
    config: &StubsConfig,
    driver: &GenerationDriver,
) -> Result<GenerationOutcome> {
    run(host, config, Scope::Test, Operation::StubsTest, driver)
}

fn run(
    host: &mut dyn BuildHost,
    config: &StubsConfig,
    scope: Scope,
    operation: Operation,
    driver: &GenerationDriver,
) -> Result<GenerationOutcome> {
    if config.skip {
        info!("{} stub generation skipped by configuration", scope);
        return Ok(GenerationOutcome::Skipped {
            reason: "skipped by configuration".to_string(),
        });
    }

    let sources = fs::collect_sources(&config.source_roots, SOURCE_EXTENSION)?;
    let output_dir = config.output_dir.clone().unwrap_or_else(|| {
        host.base_dir()
            .join("generated")
            .join("stubs")
            .join(scope.as_str())
    });

    let request = GenerationRequest {
        sources,
        search_path: config.search_path.clone(),
        output_dir: output_dir.clone(),
        options: Vec::new(),
    };

    let outcome = driver.run(operation, &request)?;

    if let GenerationOutcome::Generated { .. } = outcome {
        // Hand the stubs to the host compiler.
        host.add_source_root(scope, &output_dir);
    }

    Ok(outcome)
}
