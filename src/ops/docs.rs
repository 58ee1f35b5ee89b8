//! Build-phase entry points for API documentation generation.
//!
//! Unlike stub generation, documentation outputs keep their timestamps and
//! are never registered as source roots; the HTML tree is a terminal
//! artifact.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::capability::Operation;
use crate::driver::{GenerationDriver, GenerationOutcome, GenerationRequest};
use crate::host::{BuildHost, Scope};
use crate::ops::stubs::SOURCE_EXTENSION;
use crate::util::fs;

/// Configuration for one documentation phase.
#[derive(Debug, Clone, Default)]
pub struct DocsConfig {
    /// Directories scanned for `.keel` sources.
    pub source_roots: Vec<PathBuf>,
    /// Ordered toolchain search path, from the build's dependency
    /// resolution at the matching scope.
    pub search_path: Vec<PathBuf>,
    /// Output directory; defaults to `generated/doc/<scope>` under the
    /// host's base directory.
    pub output_dir: Option<PathBuf>,
    /// Documentation title, forwarded to the tool.
    pub title: Option<String>,
    /// Browser window title, forwarded to the tool.
    pub window_title: Option<String>,
    /// Skip this phase entirely.
    pub skip: bool,
}

/// Generate documentation for the main sources.
pub fn generate_docs(host: &mut dyn BuildHost, config: &DocsConfig) -> Result<GenerationOutcome> {
    generate_docs_with(host, config, &GenerationDriver::new())
}

/// Generate documentation for the test sources.
pub fn generate_test_docs(
    host: &mut dyn BuildHost,
    config: &DocsConfig,
) -> Result<GenerationOutcome> {
    generate_test_docs_with(host, config, &GenerationDriver::new())
}

/// [`generate_docs`] with an explicit driver.
pub fn generate_docs_with(
    host: &mut dyn BuildHost,
    config: &DocsConfig,
    driver: &GenerationDriver,
) -> Result<GenerationOutcome> {
    run(host, config, Scope::Main, Operation::DocMain, driver)
}

/// [`generate_test_docs`] with an explicit driver.
pub fn generate_test_docs_with(
    host: &mut dyn BuildHost,
    config: &DocsConfig,
    driver: &GenerationDriver,
) -> Result<GenerationOutcome> {
    run(host, config, Scope::Test, Operation::DocTest, driver)
}

fn run(
    host: &mut dyn BuildHost,
    config: &DocsConfig,
    scope: Scope,
    operation: Operation,
    driver: &GenerationDriver,
) -> Result<GenerationOutcome> {
    if config.skip {
        info!("{} documentation skipped by configuration", scope);
        return Ok(GenerationOutcome::Skipped {
            reason: "skipped by configuration".to_string(),
        });
    }

    let sources = fs::collect_sources(&config.source_roots, SOURCE_EXTENSION)?;
    let output_dir = config.output_dir.clone().unwrap_or_else(|| {
        host.base_dir()
            .join("generated")
            .join("doc")
            .join(scope.as_str())
    });

    let mut options = Vec::new();
    if let Some(ref title) = config.title {
        options.push(("title".to_string(), title.clone()));
    }
    if let Some(ref window_title) = config.window_title {
        options.push(("window-title".to_string(), window_title.clone()));
    }

    let request = GenerationRequest {
        sources,
        search_path: config.search_path.clone(),
        output_dir,
        options,
    };

    driver.run(operation, &request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::capability::CapabilityGate;
    use crate::test_support::fixtures::fake_toolchain;
    use crate::test_support::hosts::RecordingHost;
    use crate::test_support::runners::{RecordingRunner, RunnerScript};

    fn project_with_sources() -> (TempDir, PathBuf) {
        let project = TempDir::new().unwrap();
        let src = project.path().join("src");
        stdfs::create_dir_all(&src).unwrap();
        stdfs::write(src.join("widget.keel"), "interface Widget {}").unwrap();
        (project, src)
    }

    #[test]
    fn test_docs_never_register_source_roots() {
        let (project, src) = project_with_sources();
        let install = fake_toolchain("1.8.2");
        let mut host = RecordingHost::new(project.path());
        let runner = Arc::new(RecordingRunner::new(RunnerScript::Succeed));
        let driver = GenerationDriver::new()
            .with_gate(CapabilityGate::empty())
            .with_runner(runner.clone());

        let cfg = DocsConfig {
            source_roots: vec![src],
            search_path: vec![install.path().to_path_buf()],
            ..DocsConfig::default()
        };

        let outcome = generate_docs_with(&mut host, &cfg, &driver).unwrap();

        assert!(!outcome.is_skipped());
        assert_eq!(runner.call_count(), 1);
        assert!(host.roots.is_empty());
    }

    #[test]
    fn test_titles_are_forwarded() {
        let (project, src) = project_with_sources();
        let install = fake_toolchain("1.8.2");
        let mut host = RecordingHost::new(project.path());
        let runner = Arc::new(RecordingRunner::new(RunnerScript::Succeed));
        let driver = GenerationDriver::new()
            .with_gate(CapabilityGate::empty())
            .with_runner(runner.clone());

        let cfg = DocsConfig {
            source_roots: vec![src],
            search_path: vec![install.path().to_path_buf()],
            title: Some("Widget API".to_string()),
            window_title: Some("widget 1.0".to_string()),
            ..DocsConfig::default()
        };

        generate_test_docs_with(&mut host, &cfg, &driver).unwrap();

        let calls = runner.calls();
        let args = calls[0].get_args();
        assert!(args.contains(&"--title".to_string()));
        assert!(args.contains(&"Widget API".to_string()));
        assert!(args.contains(&"--window-title".to_string()));
    }

    #[test]
    fn test_skip_flag_is_a_noop() {
        let (project, src) = project_with_sources();
        let install = fake_toolchain("1.8.2");
        let mut host = RecordingHost::new(project.path());
        let runner = Arc::new(RecordingRunner::new(RunnerScript::Succeed));
        let driver = GenerationDriver::new().with_runner(runner.clone());

        let cfg = DocsConfig {
            source_roots: vec![src],
            search_path: vec![install.path().to_path_buf()],
            skip: true,
            ..DocsConfig::default()
        };

        let outcome = generate_docs_with(&mut host, &cfg, &driver).unwrap();

        assert!(outcome.is_skipped());
        assert_eq!(runner.call_count(), 0);
    }
}
