//! End-to-end tests against a real on-disk toolchain.
//!
//! These tests lay out a fake keel installation whose launcher is an
//! executable script, then drive it through the public API with the real
//! system runner. Script-based tests are unix-only.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use capstan::ops::{generate_docs, generate_stubs, DocsConfig, StubsConfig};
use capstan::{BuildHost, GenerationOutcome, Scope, ToolchainError};

/// Route plugin logs to the test harness; `RUST_LOG` controls verbosity.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Minimal build host that records registered source roots.
struct TestHost {
    base: PathBuf,
    roots: Vec<(Scope, PathBuf)>,
}

impl TestHost {
    fn new(base: &Path) -> Self {
        TestHost {
            base: base.to_path_buf(),
            roots: Vec::new(),
        }
    }
}

impl BuildHost for TestHost {
    fn base_dir(&self) -> &Path {
        &self.base
    }

    fn add_source_root(&mut self, scope: Scope, dir: &Path) {
        self.roots.push((scope, dir.to_path_buf()));
    }
}

const DESCRIPTOR: &str = r#"[toolchain]
name = "keel"
version = "1.8.2"

[[tool]]
name = "keelc"

[[tool.command]]
name = "stubs"
options = ["out-dir", "search-path"]

[[tool.command]]
name = "doc"
options = ["out-dir", "search-path", "title", "window-title"]
"#;

/// A launcher that behaves like keelc: `stubs` writes one header per
/// source into --out-dir, `doc` writes an index page.
#[cfg(unix)]
const LAUNCHER_SCRIPT: &str = r#"#!/bin/sh
command="$1"
shift
out=""
while [ "$#" -gt 0 ]; do
    case "$1" in
        --out-dir) out="$2"; shift 2 ;;
        --*) shift 2 ;;
        *)
            if [ "$command" = "stubs" ]; then
                name=$(basename "$1" .keel)
                printf 'struct %s;\n' "$name" > "$out/$name.h"
            fi
            shift
            ;;
    esac
done
if [ "$command" = "doc" ]; then
    printf '<html></html>\n' > "$out/index.html"
fi
"#;

#[cfg(unix)]
fn install_toolchain() -> TempDir {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("keel.toml"), DESCRIPTOR).unwrap();
    let bin = dir.path().join("bin");
    fs::create_dir(&bin).unwrap();
    let launcher = bin.join("keelc");
    fs::write(&launcher, LAUNCHER_SCRIPT).unwrap();
    fs::set_permissions(&launcher, fs::Permissions::from_mode(0o755)).unwrap();
    dir
}

fn project_with_sources(names: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    let sources = dir.path().join("interfaces");
    fs::create_dir(&sources).unwrap();
    for name in names {
        fs::write(sources.join(format!("{name}.keel")), "interface").unwrap();
    }
    dir
}

#[cfg(unix)]
#[test]
fn test_stub_generation_end_to_end() {
    init_logging();
    use std::time::SystemTime;

    let install = install_toolchain();
    let project = project_with_sources(&["widget", "frame"]);
    let mut host = TestHost::new(project.path());

    let config = StubsConfig {
        source_roots: vec![project.path().join("interfaces")],
        search_path: vec![install.path().to_path_buf()],
        output_dir: None,
        skip: false,
    };

    let outcome = generate_stubs(&mut host, &config).unwrap();

    let out_dir = project.path().join("generated/stubs/main");
    let outputs = outcome.outputs();
    assert_eq!(outputs.len(), 2);
    assert!(out_dir.join("widget.h").is_file());
    assert!(out_dir.join("frame.h").is_file());

    // Stub timestamps are normalized so they never win staleness checks.
    for output in outputs {
        let modified = fs::metadata(output).unwrap().modified().unwrap();
        assert_eq!(modified, SystemTime::UNIX_EPOCH);
    }

    // The generated directory is handed to the host exactly once.
    assert_eq!(host.roots.len(), 1);
    assert_eq!(host.roots[0], (Scope::Main, out_dir));
}

#[cfg(unix)]
#[test]
fn test_doc_generation_end_to_end() {
    init_logging();
    let install = install_toolchain();
    let project = project_with_sources(&["widget"]);
    let mut host = TestHost::new(project.path());

    let config = DocsConfig {
        source_roots: vec![project.path().join("interfaces")],
        search_path: vec![install.path().to_path_buf()],
        output_dir: None,
        title: Some("Widget API".to_string()),
        window_title: None,
        skip: false,
    };

    let outcome = generate_docs(&mut host, &config).unwrap();

    let out_dir = project.path().join("generated/doc/main");
    assert!(out_dir.join("index.html").is_file());
    assert!(!outcome.is_skipped());

    // Documentation is never registered as a source root.
    assert!(host.roots.is_empty());
}

#[cfg(unix)]
#[test]
fn test_explicit_output_dir_is_respected() {
    init_logging();
    let install = install_toolchain();
    let project = project_with_sources(&["widget"]);
    let mut host = TestHost::new(project.path());
    let custom = project.path().join("out/custom-stubs");

    let config = StubsConfig {
        source_roots: vec![project.path().join("interfaces")],
        search_path: vec![install.path().to_path_buf()],
        output_dir: Some(custom.clone()),
        skip: false,
    };

    generate_stubs(&mut host, &config).unwrap();

    assert!(custom.join("widget.h").is_file());
    assert_eq!(host.roots[0].1, custom);
}

#[test]
fn test_no_sources_is_a_skip() {
    init_logging();
    let project = TempDir::new().unwrap();
    let mut host = TestHost::new(project.path());

    let config = StubsConfig {
        source_roots: vec![project.path().join("no-such-dir")],
        search_path: Vec::new(),
        output_dir: None,
        skip: false,
    };

    let outcome = generate_stubs(&mut host, &config).unwrap();
    assert!(matches!(outcome, GenerationOutcome::Skipped { .. }));
    assert!(host.roots.is_empty());
}

#[test]
fn test_missing_toolchain_is_reported() {
    init_logging();
    let project = project_with_sources(&["widget"]);
    let empty = TempDir::new().unwrap();
    let mut host = TestHost::new(project.path());

    let config = StubsConfig {
        source_roots: vec![project.path().join("interfaces")],
        search_path: vec![empty.path().to_path_buf()],
        output_dir: None,
        skip: false,
    };

    let err = generate_stubs(&mut host, &config).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ToolchainError>(),
        Some(ToolchainError::ToolchainNotFound { .. })
    ));
    assert!(host.roots.is_empty());
}
