//! Toolchain version model.
//!
//! Keel reports its version as `major.minor[.revision][-tag]` (e.g. `1.8.2`
//! or `2.0-beta-1`). The tag is significant for equality but ignored when
//! deciding whether a version meets an operation's minimum.

use std::cmp::Ordering;
use std::fmt;

use crate::error::ToolchainError;

/// An installed keel toolchain version.
///
/// Precedence comparison ignores the tag while equality does not, so this
/// type implements neither `Ord` nor `PartialOrd`; use
/// [`Version::cmp_precedence`] or [`Version::is_at_least`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub revision: u32,
    /// Free-form pre-release tag, stored without the leading `-`.
    pub tag: Option<String>,
}

impl Version {
    /// Create an untagged version.
    pub const fn new(major: u32, minor: u32, revision: u32) -> Self {
        Version {
            major,
            minor,
            revision,
            tag: None,
        }
    }

    /// Parse `major.minor[.revision][-tag]`. A missing revision defaults
    /// to 0.
    pub fn parse(text: &str) -> Result<Version, ToolchainError> {
        let malformed = || ToolchainError::MalformedVersion {
            text: text.to_string(),
        };

        let (release, tag) = match text.find('-') {
            Some(idx) => (&text[..idx], Some(&text[idx + 1..])),
            None => (text, None),
        };
        if matches!(tag, Some(t) if t.is_empty()) {
            return Err(malformed());
        }

        let parts: Vec<&str> = release.split('.').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(malformed());
        }

        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| malformed())?;
        }

        Ok(Version {
            major: numbers[0],
            minor: numbers[1],
            revision: numbers[2],
            tag: tag.map(str::to_string),
        })
    }

    /// Compare by (major, minor, revision), ignoring the tag.
    pub fn cmp_precedence(&self, other: &Version) -> Ordering {
        (self.major, self.minor, self.revision).cmp(&(
            other.major,
            other.minor,
            other.revision,
        ))
    }

    /// Whether this version meets `threshold`.
    pub fn is_at_least(&self, threshold: &Version) -> bool {
        self.cmp_precedence(threshold) != Ordering::Less
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)?;
        if let Some(ref tag) = self.tag {
            write!(f, "-{}", tag)?;
        }
        Ok(())
    }
}
