//! Version gating of toolchain operations.
//!
//! Older keel installations simply lack some operations. Each operation
//! carries a minimum toolchain version in a read-only table; an operation
//! below its minimum is skipped with a logged reason, never failed.

use std::fmt;

use crate::toolchain::LAUNCHER;
use crate::version::Version;

const KEEL_1_5_0: Version = Version::new(1, 5, 0);
const KEEL_1_8_2: Version = Version::new(1, 8, 2);

/// A generation operation this plugin can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Header stubs for main sources.
    StubsMain,
    /// Header stubs for test sources.
    StubsTest,
    /// API documentation for main sources.
    DocMain,
    /// API documentation for test sources.
    DocTest,
}

impl Operation {
    /// Stable identifier, used in logs and gate messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::StubsMain => "generate-stubs",
            Operation::StubsTest => "generate-test-stubs",
            Operation::DocMain => "generate-doc",
            Operation::DocTest => "generate-test-doc",
        }
    }

    /// The toolchain binary that implements this operation.
    pub fn tool(&self) -> &'static str {
        LAUNCHER
    }

    /// The tool command that implements this operation.
    pub fn command(&self) -> &'static str {
        match self {
            Operation::StubsMain | Operation::StubsTest => "stubs",
            Operation::DocMain | Operation::DocTest => "doc",
        }
    }

    /// Whether this operation produces compilable stubs (and therefore
    /// gets timestamp normalization and source-root registration).
    pub fn is_stub_generation(&self) -> bool {
        matches!(self, Operation::StubsMain | Operation::StubsTest)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-operation minimum-version requirements.
///
/// The table is fixed at construction and only ever read afterwards; it is
/// safe to share across parallel build invocations.
#[derive(Debug, Clone)]
pub struct CapabilityGate {
    requirements: Vec<(Operation, Version)>,
}

impl Default for CapabilityGate {
    /// The stock table: stub generation needs keel >= 1.8.2, documentation
    /// needs keel >= 1.5.0.
    fn default() -> Self {
        CapabilityGate {
            requirements: vec![
                (Operation::StubsMain, KEEL_1_8_2),
                (Operation::StubsTest, KEEL_1_8_2),
                (Operation::DocMain, KEEL_1_5_0),
                (Operation::DocTest, KEEL_1_5_0),
            ],
        }
    }
}

impl CapabilityGate {
    /// A gate with no requirements; every operation is allowed.
    pub fn empty() -> Self {
        CapabilityGate {
            requirements: Vec::new(),
        }
    }

    /// Replace (or add) the requirement for one operation.
    pub fn with_requirement(mut self, operation: Operation, minimum: Version) -> Self {
        self.requirements.retain(|(op, _)| *op != operation);
        self.requirements.push((operation, minimum));
        self
    }

    /// The minimum version required for an operation, if any.
    pub fn requirement(&self, operation: Operation) -> Option<&Version> {
        self.requirements
            .iter()
            .find(|(op, _)| *op == operation)
            .map(|(_, min)| min)
    }

    /// Whether the located toolchain version supports the operation.
    /// Operations without a requirement are universally supported.
    pub fn supports(&self, operation: Operation, version: &Version) -> bool {
        match self.requirement(operation) {
            Some(minimum) => version.is_at_least(minimum),
            None => true,
        }
    }

    /// Human-readable reason used when an operation is skipped.
    pub fn explain(&self, operation: Operation, version: &Version) -> String {
        match self.requirement(operation) {
            Some(minimum) => format!(
                "{} requires keel >= {}, found {}",
                operation, minimum, version
            ),
            None => format!("{} is supported by every keel version", operation),
        }
    }
}
