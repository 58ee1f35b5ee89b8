//! Toolchain location and dynamic command binding.
//!
//! A [`ToolchainHandle`] is the bound view of one keel installation for the
//! duration of one generation operation. It owns the validated search path,
//! the parsed descriptor, and a private cache of resolved tool binaries and
//! checked command signatures. Nothing it caches survives the handle.
//!
//! Lookup order is always the supplied entries first, in order (first match
//! wins), then the ambient `PATH`. A build that pins a specific keel version
//! on its search path wins over a globally installed one.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::ToolchainError;
use crate::toolchain::descriptor::{ToolchainDescriptor, DESCRIPTOR_NAME};
use crate::util::process::{ToolInvocation, ToolOutput, ToolRunner};
use crate::version::Version;

/// Well-known launcher binary of the keel toolchain.
pub const LAUNCHER: &str = "keelc";

fn exe_name(name: &str) -> String {
    format!("{}{}", name, std::env::consts::EXE_SUFFIX)
}

/// A located keel installation, bound for one generation operation.
///
/// Exclusively owned by one driver invocation; concurrent operations each
/// open their own handle.
pub struct ToolchainHandle {
    entries: Vec<PathBuf>,
    root: PathBuf,
    descriptor: ToolchainDescriptor,
    version: Version,
    runner: Arc<dyn ToolRunner>,
    tools: RefCell<HashMap<String, PathBuf>>,
    signatures: RefCell<HashSet<String>>,
}

impl fmt::Debug for ToolchainHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolchainHandle")
            .field("root", &self.root)
            .field("version", &format_args!("{}", self.version))
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl ToolchainHandle {
    /// Locate the toolchain on the given search path and bind to it.
    ///
    /// Entries must be absolute; entries that do not exist are skipped
    /// during lookup rather than rejected, so a search path carrying
    /// not-yet-materialized dependency directories still works.
    pub fn open(
        search_path: &[PathBuf],
        runner: Arc<dyn ToolRunner>,
    ) -> Result<Self, ToolchainError> {
        for entry in search_path {
            if entry.as_os_str().is_empty() {
                return Err(ToolchainError::InvalidPathEntry {
                    entry: entry.clone(),
                    reason: "empty path".to_string(),
                });
            }
            if !entry.is_absolute() {
                return Err(ToolchainError::InvalidPathEntry {
                    entry: entry.clone(),
                    reason: "not an absolute path".to_string(),
                });
            }
        }

        let (root, descriptor_path) = Self::find_root(search_path)?;

        let text = fs::read_to_string(&descriptor_path).map_err(|e| {
            ToolchainError::Descriptor {
                path: descriptor_path.clone(),
                detail: e.to_string(),
            }
        })?;
        let descriptor =
            ToolchainDescriptor::parse(&text).map_err(|e| ToolchainError::Descriptor {
                path: descriptor_path.clone(),
                detail: e.to_string(),
            })?;
        let version = Version::parse(&descriptor.toolchain.version)?;

        debug!(
            "located {} {} at {}",
            descriptor.toolchain.name,
            version,
            root.display()
        );

        Ok(ToolchainHandle {
            entries: search_path.to_vec(),
            root,
            descriptor,
            version,
            runner,
            tools: RefCell::new(HashMap::new()),
            signatures: RefCell::new(HashSet::new()),
        })
    }

    /// Find the installation root: the first search-path entry containing a
    /// descriptor, falling back to the installation next to an ambient
    /// `keelc`.
    fn find_root(search_path: &[PathBuf]) -> Result<(PathBuf, PathBuf), ToolchainError> {
        for entry in search_path {
            let candidate = entry.join(DESCRIPTOR_NAME);
            if candidate.is_file() {
                return Ok((entry.clone(), candidate));
            }
        }

        if let Ok(launcher) = which::which(LAUNCHER) {
            if let Some(root) = launcher.parent().and_then(Path::parent) {
                let candidate = root.join(DESCRIPTOR_NAME);
                if candidate.is_file() {
                    debug!(
                        "no descriptor on the search path, using ambient toolchain at {}",
                        root.display()
                    );
                    return Ok((root.to_path_buf(), candidate));
                }
            }
        }

        Err(ToolchainError::ToolchainNotFound {
            searched: search_path.to_vec(),
        })
    }

    /// The installed toolchain's version.
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// The installation root containing the descriptor.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a tool binary by name, first match on the search path wins,
    /// then the ambient `PATH`. Cached per handle.
    fn resolve_tool(&self, name: &str) -> Result<PathBuf, ToolchainError> {
        if let Some(path) = self.tools.borrow().get(name) {
            return Ok(path.clone());
        }

        let file = exe_name(name);
        let mut found = None;
        for entry in &self.entries {
            let candidate = entry.join("bin").join(&file);
            if candidate.is_file() {
                found = Some(candidate);
                break;
            }
        }
        if found.is_none() {
            let candidate = self.root.join("bin").join(&file);
            if candidate.is_file() {
                found = Some(candidate);
            }
        }
        let path = match found.or_else(|| which::which(name).ok()) {
            Some(path) => path,
            None => {
                return Err(ToolchainError::ToolchainNotFound {
                    searched: self.entries.clone(),
                })
            }
        };

        debug!("resolved tool `{}` to {}", name, path.display());
        self.tools
            .borrow_mut()
            .insert(name.to_string(), path.clone());
        Ok(path)
    }

    /// Bind a tool command with the option keys the caller intends to pass.
    ///
    /// The descriptor must advertise the command and every requested option
    /// key; a mismatch means the installed toolchain is incompatible with
    /// this operation even though it passed the version gate.
    pub fn bind(
        &self,
        tool: &str,
        command: &str,
        option_keys: &[&str],
    ) -> Result<BoundCommand, ToolchainError> {
        let program = self.resolve_tool(tool)?;

        let signature = format!("{}::{}::{}", tool, command, option_keys.join(","));
        if !self.signatures.borrow().contains(&signature) {
            let advertised = self.descriptor.command(tool, command).ok_or_else(|| {
                ToolchainError::Binding {
                    tool: tool.to_string(),
                    command: command.to_string(),
                    detail: format!(
                        "the installed toolchain (version {}) does not advertise this command",
                        self.version
                    ),
                }
            })?;

            for key in option_keys {
                if !advertised.options.iter().any(|o| o == key) {
                    return Err(ToolchainError::Binding {
                        tool: tool.to_string(),
                        command: command.to_string(),
                        detail: format!(
                            "option `--{}` is not accepted by `{} {}` (version {})",
                            key, tool, command, self.version
                        ),
                    });
                }
            }

            self.signatures.borrow_mut().insert(signature);
        }

        Ok(BoundCommand {
            tool: tool.to_string(),
            command: command.to_string(),
            invocation: ToolInvocation::new(program).arg(command),
            runner: self.runner.clone(),
        })
    }
}

/// A resolved, signature-checked tool command ready to run.
pub struct BoundCommand {
    tool: String,
    command: String,
    invocation: ToolInvocation,
    runner: Arc<dyn ToolRunner>,
}

impl fmt::Debug for BoundCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundCommand")
            .field("tool", &self.tool)
            .field("command", &self.command)
            .field("invocation", &self.invocation)
            .finish_non_exhaustive()
    }
}

impl BoundCommand {
    /// Append a `--key value` option pair.
    pub fn option(mut self, key: &str, value: impl AsRef<OsStr>) -> Self {
        self.invocation = self.invocation.arg(format!("--{}", key)).arg(value);
        self
    }

    /// Append positional arguments (typically the source files).
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.invocation = self.invocation.args(args);
        self
    }

    /// The underlying invocation, for logging.
    pub fn invocation(&self) -> &ToolInvocation {
        &self.invocation
    }

    /// Run the command to completion.
    ///
    /// A process that could not be spawned is a [`ToolchainError::Launch`];
    /// a process that ran and exited nonzero is a
    /// [`ToolchainError::Invocation`] carrying its stderr.
    pub fn run(self) -> Result<ToolOutput, ToolchainError> {
        debug!("invoking: {}", self.invocation.display_command());

        let output =
            self.runner
                .run(&self.invocation)
                .map_err(|source| ToolchainError::Launch {
                    tool: self.tool.clone(),
                    source,
                })?;

        if !output.success() {
            return Err(ToolchainError::Invocation {
                tool: self.tool,
                command: self.command,
                status: output.status_text(),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }

        Ok(output)
    }
}
