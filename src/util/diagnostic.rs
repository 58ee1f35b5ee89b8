//! User-friendly diagnostic messages.
//!
//! Every fatal toolchain error must name its probable cause and suggest a
//! fix, so the build operator can self-diagnose without reading this
//! crate's internals.

use std::fmt;
use std::path::PathBuf;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when the toolchain cannot be located at all.
    pub const DECLARE_TOOLCHAIN: &str =
        "Declare keel as a toolchain dependency, or install it so `keelc` is on PATH";

    /// Suggestion when the installed toolchain lacks a required command.
    pub const UPGRADE_TOOLCHAIN: &str =
        "Upgrade keel to a version that provides this operation";

    /// Suggestion when the tool itself reported errors.
    pub const CHECK_SOURCES: &str =
        "Fix the reported errors in your `.keel` sources and rebuild";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Severity {
    /// Severity label, optionally wrapped in ANSI color.
    fn label(&self, color: bool) -> &'static str {
        match (self, color) {
            (Severity::Error, false) => "error",
            (Severity::Warning, false) => "warning",
            (Severity::Note, false) => "note",
            (Severity::Error, true) => "\x1b[1;31merror\x1b[0m",
            (Severity::Warning, true) => "\x1b[1;33mwarning\x1b[0m",
            (Severity::Note, true) => "\x1b[1;36mnote\x1b[0m",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label(false))
    }
}

/// A diagnostic message with optional context and suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Warning,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    ///
    /// One `help:` line per suggestion, so a host that forwards stderr
    /// line-by-line keeps each suggestion intact.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}: {}\n",
            self.severity.label(color),
            self.message
        ));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  at {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  | {}\n", ctx));
        }

        let help_prefix = if color { "\x1b[1;32mhelp\x1b[0m" } else { "help" };
        for suggestion in &self.suggestions {
            output.push_str(&format!("{}: {}\n", help_prefix, suggestion));
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
