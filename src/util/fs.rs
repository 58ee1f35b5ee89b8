//! Filesystem helpers for source and output scanning.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Collect source files with the given extension under the given roots.
///
/// Roots that do not exist are skipped; a project without test sources is
/// not an error.
pub fn collect_sources(roots: &[PathBuf], extension: &str) -> Result<BTreeSet<PathBuf>> {
    let mut sources = BTreeSet::new();

    for root in roots {
        if !root.exists() {
            tracing::debug!("source root does not exist, skipping: {}", root.display());
            continue;
        }

        for entry in WalkDir::new(root) {
            let entry = entry
                .with_context(|| format!("failed to walk source root: {}", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(extension) {
                sources.insert(path.to_path_buf());
            }
        }
    }

    Ok(sources)
}

/// Collect every file under a directory, sorted for stable logs and tests.
pub fn collect_outputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut outputs = Vec::new();

    if !dir.exists() {
        return Ok(outputs);
    }

    for entry in WalkDir::new(dir) {
        let entry =
            entry.with_context(|| format!("failed to walk output directory: {}", dir.display()))?;
        if entry.file_type().is_file() {
            outputs.push(entry.path().to_path_buf());
        }
    }

    outputs.sort();
    Ok(outputs)
}

/// Reset the modification time of every file to the Unix epoch, so host
/// staleness checks always treat them as fresh inputs.
pub fn reset_modified_times(files: &[PathBuf]) -> Result<()> {
    let epoch = fs::FileTimes::new().set_modified(SystemTime::UNIX_EPOCH);

    for path in files {
        let file = fs::OpenOptions::new()
            .write(true)
            .open(path)
            .with_context(|| format!("failed to open generated file: {}", path.display()))?;
        file.set_times(epoch)
            .with_context(|| format!("failed to reset timestamp: {}", path.display()))?;
    }

    Ok(())
}
