//! Build-phase entry points.
//!
//! Each function here corresponds to one phase of the enclosing build:
//! stub generation and documentation, each for main and test sources.

pub mod docs;
pub mod stubs;

pub use docs::{generate_docs, generate_test_docs, DocsConfig};
pub use stubs::{generate_stubs, generate_test_stubs, StubsConfig, SOURCE_EXTENSION};
