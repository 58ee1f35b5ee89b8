//! Dynamic binding to the optionally-installed keel toolchain.
//!
//! The build has no compile-time knowledge of keel. Everything here is
//! resolved at build time from the operation's toolchain search path: the
//! installation (via its `keel.toml` descriptor), its version, its tool
//! binaries, and the commands they advertise.

mod descriptor;
mod locator;

pub use descriptor::{CommandSection, ToolchainDescriptor, DESCRIPTOR_NAME};
pub use locator::{BoundCommand, ToolchainHandle, LAUNCHER};
