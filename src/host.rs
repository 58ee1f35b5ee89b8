//! Integration surface for the enclosing build system.

use std::fmt;
use std::path::Path;

/// Which half of the project an operation serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Main,
    Test,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Main => "main",
            Scope::Test => "test",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the enclosing build system provides to this plugin.
///
/// Hosts implement this once per project build; the phase entry points in
/// [`crate::ops`] use it to place default output directories and to hand
/// generated stubs back for compilation.
pub trait BuildHost {
    /// Project base directory; default output locations live under it.
    fn base_dir(&self) -> &Path;

    /// Register a directory of generated sources for compilation in the
    /// given scope.
    fn add_source_root(&mut self, scope: Scope, dir: &Path);
}
