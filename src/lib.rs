//! Capstan - build plugin driving the keel codegen toolchain
//!
//! This crate locates the optionally-installed keel toolchain on a build's
//! dependency search path, gates each operation on the installed version,
//! binds to the toolchain's commands dynamically, and invokes it to
//! generate header stubs and API documentation.

pub mod capability;
pub mod driver;
pub mod error;
pub mod host;
pub mod ops;
pub mod toolchain;
pub mod util;
pub mod version;

/// Test utilities and mocks for capstan unit tests.
///
/// Provides an on-disk fake toolchain fixture, a recording process runner,
/// and a recording build host.
#[cfg(test)]
pub mod test_support;

pub use capability::{CapabilityGate, Operation};
pub use driver::{GenerationDriver, GenerationOutcome, GenerationRequest};
pub use error::ToolchainError;
pub use host::{BuildHost, Scope};
pub use toolchain::{BoundCommand, ToolchainHandle};
pub use version::Version;
