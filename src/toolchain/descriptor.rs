//! The `keel.toml` toolchain descriptor.
//!
//! Every keel installation ships a descriptor at its root advertising the
//! toolchain version and, per tool, the commands and option keys it
//! accepts. Binding checks requested signatures against this table instead
//! of discovering them by trial invocation.

use serde::Deserialize;

/// File name of the descriptor at a toolchain root.
pub const DESCRIPTOR_NAME: &str = "keel.toml";

/// Parsed `keel.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolchainDescriptor {
    pub toolchain: ToolchainSection,
    #[serde(default)]
    pub tool: Vec<ToolSection>,
}

/// The `[toolchain]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolchainSection {
    pub name: String,
    pub version: String,
}

/// One `[[tool]]` table: a binary shipped under the installation's `bin/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolSection {
    pub name: String,
    #[serde(default)]
    pub command: Vec<CommandSection>,
}

/// One advertised command of a tool, with the option keys it accepts.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandSection {
    pub name: String,
    #[serde(default)]
    pub options: Vec<String>,
}

impl ToolchainDescriptor {
    /// Parse descriptor text.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Look up an advertised command by tool and command name.
    pub fn command(&self, tool: &str, command: &str) -> Option<&CommandSection> {
        self.tool
            .iter()
            .find(|t| t.name == tool)?
            .command
            .iter()
            .find(|c| c.name == command)
    }
}
