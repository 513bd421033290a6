//! Release version parsing and ordering.
//!
//! Upstream publishes tags like `v1.22.0` and `v1.22.0-rc.1`. Ordering is
//! lexicographic on the numeric triple only; a pre-release suffix is kept for
//! display but never participates in comparison, so `1.22.0-rc.1` and
//! `1.22.0` are equal for gating purposes.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VersionError {
    #[error("invalid release version {tag:?}: {source}")]
    Invalid {
        tag: String,
        #[source]
        source: semver::Error,
    },
}

/// A kubectl release version: a dotted numeric triple plus an optional
/// pre-release suffix that is ignored for ordering.
#[derive(Debug, Clone)]
pub struct ReleaseVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Option<String>,
}

impl ReleaseVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: None,
        }
    }

    /// Parse a tag such as `1.21.5`, `v1.21.5` or `v1.22.0-rc.1`.
    pub fn parse(tag: &str) -> Result<Self, VersionError> {
        let trimmed = tag.trim().trim_start_matches('v');
        let parsed = semver::Version::parse(trimmed).map_err(|source| VersionError::Invalid {
            tag: tag.to_string(),
            source,
        })?;

        let pre = if parsed.pre.is_empty() {
            None
        } else {
            Some(parsed.pre.as_str().to_string())
        };

        Ok(Self {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            pre,
        })
    }

    /// The numeric triple that ordering and capability gates operate on.
    pub fn triple(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }

    /// `major.minor`, the release line this version belongs to.
    pub fn line(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }

    /// True when the version carries no pre-release suffix.
    pub fn is_stable(&self) -> bool {
        self.pre.is_none()
    }
}

// Comparison ignores `pre` entirely. Implemented by hand (rather than
// derived) so that Eq, Ord and Hash stay consistent with each other.
impl PartialEq for ReleaseVersion {
    fn eq(&self, other: &Self) -> bool {
        self.triple() == other.triple()
    }
}

impl Eq for ReleaseVersion {}

impl Ord for ReleaseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.triple().cmp(&other.triple())
    }
}

impl PartialOrd for ReleaseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for ReleaseVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.triple().hash(state);
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{pre}")?;
        }
        Ok(())
    }
}

impl FromStr for ReleaseVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let v = ReleaseVersion::parse("1.21.5").unwrap();
        assert_eq!(v.triple(), (1, 21, 5));
        assert!(v.is_stable());
    }

    #[test]
    fn test_parse_v_prefix() {
        let v = ReleaseVersion::parse("v1.21.5").unwrap();
        assert_eq!(v.triple(), (1, 21, 5));
        assert_eq!(v.to_string(), "1.21.5");
    }

    #[test]
    fn test_parse_prerelease() {
        let v = ReleaseVersion::parse("v1.22.0-rc.1").unwrap();
        assert_eq!(v.triple(), (1, 22, 0));
        assert_eq!(v.pre.as_deref(), Some("rc.1"));
        assert!(!v.is_stable());
        assert_eq!(v.to_string(), "1.22.0-rc.1");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(ReleaseVersion::parse("1.21").is_err());
        assert!(ReleaseVersion::parse("kubernetes-1.2").is_err());
        assert!(ReleaseVersion::parse("").is_err());
    }

    #[test]
    fn test_ordering_on_triple() {
        let a = ReleaseVersion::parse("1.20.15").unwrap();
        let b = ReleaseVersion::parse("1.21.0").unwrap();
        let c = ReleaseVersion::parse("1.21.5").unwrap();
        assert!(a < b);
        assert!(b < c);
        assert!(c > ReleaseVersion::new(1, 20, 99));
    }

    #[test]
    fn test_prerelease_ignored_for_ordering() {
        let rc = ReleaseVersion::parse("1.22.0-rc.1").unwrap();
        let ga = ReleaseVersion::parse("1.22.0").unwrap();
        assert_eq!(rc, ga);
        assert!(rc >= ga);
        assert!(rc >= ReleaseVersion::new(1, 22, 0));
    }

    #[test]
    fn test_line() {
        let v = ReleaseVersion::parse("1.21.5").unwrap();
        assert_eq!(v.line(), "1.21");
    }
}
