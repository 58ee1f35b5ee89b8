//! Failure taxonomy for toolchain location and invocation.
//!
//! Every variant is terminal for the current operation; nothing here is
//! retried. Each variant names its probable cause so a build operator can
//! tell a missing dependency from an incompatible toolchain from a genuine
//! error in their own sources.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error raised while locating, binding, or invoking the keel toolchain.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ToolchainError {
    /// The version string reported by the toolchain does not parse.
    #[error("malformed toolchain version `{text}`")]
    #[diagnostic(
        code(capstan::toolchain::malformed_version),
        help("expected `<major>.<minor>[.<revision>][-tag]`, e.g. `1.8.2` or `2.0-beta-1`")
    )]
    MalformedVersion { text: String },

    /// No toolchain descriptor (or tool binary) anywhere on the search path
    /// or the ambient `PATH`. This is the normal signal that keel is not a
    /// declared dependency of the build.
    #[error("keel toolchain not found on the toolchain search path")]
    #[diagnostic(
        code(capstan::toolchain::not_found),
        help("declare keel as a toolchain dependency of your project, or install it so `keelc` is on PATH")
    )]
    ToolchainNotFound { searched: Vec<PathBuf> },

    /// A search-path entry cannot be used as a lookup location.
    #[error("invalid toolchain path entry `{entry}`: {reason}")]
    #[diagnostic(code(capstan::toolchain::invalid_path_entry))]
    InvalidPathEntry { entry: PathBuf, reason: String },

    /// A descriptor was found but could not be read or parsed.
    #[error("unreadable toolchain descriptor at {path}")]
    #[diagnostic(
        code(capstan::toolchain::descriptor),
        help("the keel installation looks damaged; reinstall the toolchain")
    )]
    Descriptor { path: PathBuf, detail: String },

    /// The installed toolchain does not advertise the command (or option)
    /// this operation needs, even though it passed the version gate.
    #[error("installed keel does not provide `{tool} {command}`: {detail}")]
    #[diagnostic(
        code(capstan::toolchain::binding),
        help("the installed toolchain is incompatible with this operation despite meeting its minimum version; upgrade keel")
    )]
    Binding {
        tool: String,
        command: String,
        detail: String,
    },

    /// The tool process could not be spawned at all.
    #[error("failed to launch `{tool}`")]
    #[diagnostic(code(capstan::toolchain::launch))]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran and reported a failure of its own, typically a genuine
    /// error in the user's `.keel` sources.
    #[error("`{tool} {command}` failed ({status})")]
    #[diagnostic(
        code(capstan::toolchain::invocation),
        help("this usually indicates an error in your `.keel` sources; see the tool output")
    )]
    Invocation {
        tool: String,
        command: String,
        status: String,
        stderr: String,
    },
}

impl ToolchainError {
    /// Render this error as a terminal diagnostic with context and
    /// suggested fixes.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ToolchainError::MalformedVersion { text } => {
                Diagnostic::error(format!("malformed toolchain version `{}`", text))
                    .with_suggestion("Expected `<major>.<minor>[.<revision>][-tag]`")
            }

            ToolchainError::ToolchainNotFound { searched } => {
                let mut diag =
                    Diagnostic::error("keel toolchain not found on the toolchain search path");
                if searched.is_empty() {
                    diag = diag.with_context("the toolchain search path is empty");
                } else {
                    for entry in searched {
                        diag = diag.with_context(format!("searched: {}", entry.display()));
                    }
                }
                diag.with_suggestion(suggestions::DECLARE_TOOLCHAIN)
            }

            ToolchainError::InvalidPathEntry { entry, reason } => Diagnostic::error(format!(
                "invalid toolchain path entry `{}`",
                entry.display()
            ))
            .with_context(reason.clone()),

            ToolchainError::Descriptor { path, detail } => {
                Diagnostic::error("unreadable toolchain descriptor")
                    .with_location(path.clone())
                    .with_context(detail.clone())
                    .with_suggestion("Reinstall the keel toolchain")
            }

            ToolchainError::Binding {
                tool,
                command,
                detail,
            } => Diagnostic::error(format!(
                "installed keel does not provide `{} {}`",
                tool, command
            ))
            .with_context(detail.clone())
            .with_suggestion(suggestions::UPGRADE_TOOLCHAIN),

            ToolchainError::Launch { tool, source } => {
                Diagnostic::error(format!("failed to launch `{}`", tool))
                    .with_context(source.to_string())
                    .with_suggestion(suggestions::DECLARE_TOOLCHAIN)
            }

            ToolchainError::Invocation {
                tool,
                command,
                status,
                stderr,
            } => {
                let mut diag =
                    Diagnostic::error(format!("`{} {}` failed ({})", tool, command, status));
                for line in stderr.lines().take(20) {
                    diag = diag.with_context(line.to_string());
                }
                diag.with_suggestion(suggestions::CHECK_SOURCES)
            }
        }
    }
}
