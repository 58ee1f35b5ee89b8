//! Recording build host for adapter tests.

use std::path::{Path, PathBuf};

use crate::host::{BuildHost, Scope};

/// A [`BuildHost`] that records source-root registrations.
pub struct RecordingHost {
    base: PathBuf,
    pub roots: Vec<(Scope, PathBuf)>,
}

impl RecordingHost {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        RecordingHost {
            base: base.into(),
            roots: Vec::new(),
        }
    }
}

impl BuildHost for RecordingHost {
    fn base_dir(&self) -> &Path {
        &self.base
    }

    fn add_source_root(&mut self, scope: Scope, dir: &Path) {
        self.roots.push((scope, dir.to_path_buf()));
    }
}
