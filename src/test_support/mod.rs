//! Test utilities and mocks for capstan unit tests.
//!
//! Only available when compiling tests. Provides an on-disk fake toolchain
//! fixture and a recording process runner.

pub mod fixtures;
pub mod hosts;
pub mod runners;
