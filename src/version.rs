//! Format versioning utilities
//!
//! A format version tag (`v<major>.<minor>`) describes the compatibility level
//! of the whole set of families at once. Minor bumps only ever append codes;
//! anything else requires a major bump.

use std::fmt;

use semver::Version;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, SchemaError};

/// Format version tag of this snapshot
pub const FORMAT_VERSION: &str = "v1.3";

const CURRENT_MAJOR: u64 = 1;
const CURRENT_MINOR: u64 = 3;

/// Which payload versions a consumer agrees to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VersionPolicy {
    /// Only the exact version of this build
    Exact,
    /// Same major, minor not newer than ours
    OlderOrEqual,
    /// Same major, any minor; codes from a newer minor decode to sentinels
    #[default]
    AllowNewerMinor,
}

/// A parsed format version
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FormatVersion {
    pub version: Version,
}

impl FormatVersion {
    /// The version of this build (`v1.3`)
    pub fn current() -> Self {
        Self {
            version: Version::new(CURRENT_MAJOR, CURRENT_MINOR, 0),
        }
    }

    /// Parse a tag such as `v1.3`, `1.3` or `v1.3.1`
    pub fn parse(tag: &str) -> Result<Self> {
        let trimmed = tag.trim();
        let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);

        let normalized = match bare.split('.').count() {
            2 => format!("{}.0", bare),
            3 => bare.to_string(),
            _ => return Err(SchemaError::InvalidVersion(tag.to_string())),
        };

        let version = Version::parse(&normalized)
            .map_err(|e| SchemaError::InvalidVersion(format!("{}: {}", tag, e)))?;
        if !version.pre.is_empty() || !version.build.is_empty() {
            return Err(SchemaError::InvalidVersion(tag.to_string()));
        }

        Ok(Self { version })
    }

    pub fn major(&self) -> u64 {
        self.version.major
    }

    pub fn minor(&self) -> u64 {
        self.version.minor
    }

    /// Whether a payload at `payload` can be decoded by a consumer at `self`
    /// under `policy`
    pub fn accepts(&self, payload: &FormatVersion, policy: VersionPolicy) -> bool {
        if payload.major() != self.major() {
            return false;
        }

        match policy {
            VersionPolicy::Exact => payload.minor() == self.minor(),
            VersionPolicy::OlderOrEqual => payload.minor() <= self.minor(),
            VersionPolicy::AllowNewerMinor => true,
        }
    }

    pub fn is_major_bump_from(&self, other: &FormatVersion) -> bool {
        self.major() > other.major()
    }

    pub fn is_minor_bump_from(&self, other: &FormatVersion) -> bool {
        self.major() == other.major() && self.minor() > other.minor()
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.patch == 0 {
            write!(f, "v{}.{}", self.version.major, self.version.minor)
        } else {
            write!(f, "v{}", self.version)
        }
    }
}

/// Decide whether a payload tagged with `tag` can be decoded by this build.
///
/// Fails with `InvalidVersion` for malformed tags and with
/// `UnsupportedFormatVersion` when the policy rejects the version.
pub fn check_payload_version(tag: &str, policy: VersionPolicy) -> Result<FormatVersion> {
    let payload = FormatVersion::parse(tag)?;
    let current = FormatVersion::current();

    if !current.accepts(&payload, policy) {
        return Err(SchemaError::UnsupportedFormatVersion {
            found: payload.to_string(),
            supported: current.to_string(),
        });
    }

    if payload.minor() > current.minor() {
        warn!(
            payload = %payload,
            current = %current,
            "payload uses a newer minor version, unknown codes will decode as sentinels"
        );
    }

    Ok(payload)
}
