//! Version triple of the native core

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// `major.minor.patch` version
///
/// Serialized as its string form, e.g. `"1.4.0"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionTriple {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl VersionTriple {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Whether `self`, as the actual version, satisfies `expected`
    ///
    /// Majors must match; the actual minor.patch may not be older.
    pub fn is_compatible_with(&self, expected: &VersionTriple) -> bool {
        self.major == expected.major && (self.minor, self.patch) >= (expected.minor, expected.patch)
    }
}

/// Version reported by the native core
pub fn native_version() -> VersionTriple {
    let (mut major, mut minor, mut patch) = (0, 0, 0);
    unsafe { coretypes_runtime::ct_core_types_get_version(&mut major, &mut minor, &mut patch) };
    VersionTriple::new(major, minor, patch)
}

impl fmt::Display for VersionTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVersionError {
    input: String,
}

impl fmt::Display for ParseVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid version '{}': expected major.minor.patch", self.input)
    }
}

impl std::error::Error for ParseVersionError {}

impl FromStr for VersionTriple {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseVersionError { input: s.to_string() };
        let mut parts = s.trim().split('.').map(|p| p.parse::<u32>().map_err(|_| err()));

        let version = VersionTriple {
            major: parts.next().ok_or_else(err)??,
            minor: parts.next().ok_or_else(err)??,
            patch: parts.next().ok_or_else(err)??,
        };
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(version)
    }
}

impl TryFrom<String> for VersionTriple {
    type Error = ParseVersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VersionTriple> for String {
    fn from(value: VersionTriple) -> Self {
        value.to_string()
    }
}
