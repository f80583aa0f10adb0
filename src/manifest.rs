//! Schema manifest
//!
//! A serializable snapshot of every family and the format version, used to
//! publish a release, verify it later and diff it against the next one.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::checksum::Checksum;
use crate::config::OutputFormat;
use crate::error::{Result, SchemaError};
use crate::registry::{FamilyTable, SchemaRegistry};
use crate::version::FormatVersion;

/// One `(symbol, code)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberEntry {
    pub symbol: String,
    pub code: u8,
}

/// All members of one family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyManifest {
    pub name: String,
    pub members: Vec<MemberEntry>,
    /// Code of the "no information" member
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentinel: Option<u8>,
}

impl FamilyManifest {
    pub fn from_table(table: &FamilyTable) -> Self {
        Self {
            name: table.family.name().to_string(),
            members: table
                .members
                .iter()
                .map(|(symbol, code)| MemberEntry {
                    symbol: symbol.to_string(),
                    code: *code,
                })
                .collect(),
            sentinel: table.sentinel,
        }
    }

    pub fn code_of(&self, symbol: &str) -> Option<u8> {
        self.members.iter().find(|m| m.symbol == symbol).map(|m| m.code)
    }

    pub fn symbol_of(&self, code: u8) -> Option<&str> {
        self.members
            .iter()
            .find(|m| m.code == code)
            .map(|m| m.symbol.as_str())
    }
}

/// Statistics about a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestStats {
    pub total_families: usize,
    pub total_codes: usize,
    pub families_with_sentinel: usize,
}

/// Snapshot of the full registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaManifest {
    /// Format version tag (e.g. `"v1.3"`)
    pub format_version: String,
    /// All families in registry order
    pub families: Vec<FamilyManifest>,
    /// Checksum of the version tag and families
    pub checksum: Checksum,
    /// When this manifest was generated (not covered by the checksum)
    pub generated_at: DateTime<Utc>,
    pub stats: ManifestStats,
}

impl SchemaManifest {
    /// Build a manifest from a version tag and a set of families
    pub fn new(format_version: impl Into<String>, families: Vec<FamilyManifest>) -> Result<Self> {
        let format_version = format_version.into();
        let checksum = Self::compute_checksum(&format_version, &families)?;

        let stats = ManifestStats {
            total_families: families.len(),
            total_codes: families.iter().map(|f| f.members.len()).sum(),
            families_with_sentinel: families.iter().filter(|f| f.sentinel.is_some()).count(),
        };

        Ok(Self {
            format_version,
            families,
            checksum,
            generated_at: Utc::now(),
            stats,
        })
    }

    /// Snapshot a registry
    pub fn from_registry(registry: &SchemaRegistry) -> Result<Self> {
        let families = registry
            .families()
            .iter()
            .map(FamilyManifest::from_table)
            .collect();
        Self::new(registry.format_version(), families)
    }

    /// Snapshot of this build's registry
    pub fn current() -> Result<Self> {
        Self::from_registry(SchemaRegistry::global())
    }

    fn compute_checksum(format_version: &str, families: &[FamilyManifest]) -> Result<Checksum> {
        let content = serde_json::json!({
            "format_version": format_version,
            "families": serde_json::to_value(families)?,
        });
        Ok(Checksum::from_json(&content))
    }

    /// Parsed format version
    pub fn version(&self) -> Result<FormatVersion> {
        FormatVersion::parse(&self.format_version)
    }

    pub fn family(&self, name: &str) -> Option<&FamilyManifest> {
        self.families.iter().find(|f| f.name == name)
    }

    /// Whether the stored checksum matches the content
    pub fn verify(&self) -> bool {
        match Self::compute_checksum(&self.format_version, &self.families) {
            Ok(actual) => actual == self.checksum,
            Err(_) => false,
        }
    }

    /// Like [`Self::verify`], reporting both checksums on mismatch
    pub fn verify_checksum(&self) -> Result<()> {
        let actual = Self::compute_checksum(&self.format_version, &self.families)?;
        if actual != self.checksum {
            return Err(SchemaError::ChecksumMismatch {
                expected: self.checksum.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(())
    }

    /// Check the invariants every snapshot must hold: a parseable version,
    /// well-formed names, unique families, unique codes and symbols within a
    /// family, and sentinels at code zero.
    pub fn validate(&self) -> Result<()> {
        self.version()?;

        let family_name = Regex::new(r"^[A-Z][A-Za-z0-9]*$")?;
        let symbol_name = Regex::new(r"^[A-Z][A-Z0-9_]*$")?;
        let mut family_names = HashSet::new();

        for family in &self.families {
            if !family_name.is_match(&family.name) {
                return Err(invalid(format!("family name '{}' is not PascalCase", family.name)));
            }
            if !family_names.insert(family.name.as_str()) {
                return Err(invalid(format!("family '{}' appears twice", family.name)));
            }

            let mut codes = HashSet::new();
            let mut symbols = HashSet::new();
            for member in &family.members {
                if !symbol_name.is_match(&member.symbol) {
                    return Err(invalid(format!(
                        "symbol '{}' in {} is not SCREAMING_SNAKE_CASE",
                        member.symbol, family.name
                    )));
                }
                if !codes.insert(member.code) {
                    return Err(invalid(format!(
                        "code {} is used twice in {}",
                        member.code, family.name
                    )));
                }
                if !symbols.insert(member.symbol.as_str()) {
                    return Err(invalid(format!(
                        "symbol '{}' is used twice in {}",
                        member.symbol, family.name
                    )));
                }
            }

            match family.sentinel {
                Some(0) if codes.contains(&0) => {}
                Some(0) => {
                    return Err(invalid(format!("sentinel code 0 is not a member of {}", family.name)))
                }
                Some(code) => {
                    return Err(invalid(format!(
                        "sentinel of {} must be code 0, found {}",
                        family.name, code
                    )))
                }
                None if codes.contains(&0) => {
                    return Err(invalid(format!(
                        "code 0 is reserved for a sentinel but {} declares none",
                        family.name
                    )))
                }
                None => {}
            }
        }

        Ok(())
    }

    /// Serialize as JSON
    pub fn to_json(&self, format: OutputFormat) -> Result<String> {
        let json = match format {
            OutputFormat::Pretty => serde_json::to_string_pretty(self)?,
            OutputFormat::Compact => serde_json::to_string(self)?,
        };
        Ok(json)
    }

    /// Load a manifest from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading manifest");
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the manifest as JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>, format: OutputFormat) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json(format)?)?;
        Ok(())
    }
}

fn invalid(message: String) -> SchemaError {
    SchemaError::InvalidManifest(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family(name: &str, members: &[(&str, u8)], sentinel: Option<u8>) -> FamilyManifest {
        FamilyManifest {
            name: name.to_string(),
            members: members
                .iter()
                .map(|(symbol, code)| MemberEntry {
                    symbol: symbol.to_string(),
                    code: *code,
                })
                .collect(),
            sentinel,
        }
    }

    #[test]
    fn test_current_manifest() {
        let manifest = SchemaManifest::current().unwrap();
        assert_eq!(manifest.format_version, "v1.3");
        assert_eq!(manifest.stats.total_families, 6);
        assert_eq!(manifest.stats.total_codes, 7 + 8 + 11 + 3 + 6 + 10);
        assert_eq!(manifest.stats.families_with_sentinel, 5);
        assert!(manifest.verify());
        manifest.validate().unwrap();
    }

    #[test]
    fn test_checksum_ignores_timestamp() {
        let a = SchemaManifest::current().unwrap();
        let mut b = SchemaManifest::current().unwrap();
        b.generated_at = a.generated_at - chrono::Duration::days(1);
        assert_eq!(a.checksum, b.checksum);
        assert!(b.verify());
    }

    #[test]
    fn test_tampering_detected() {
        let mut manifest = SchemaManifest::current().unwrap();
        manifest.families[2].members[4].code = 40;
        assert!(!manifest.verify());
        assert!(matches!(
            manifest.verify_checksum(),
            Err(SchemaError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_duplicate_code() {
        let manifest = SchemaManifest::new(
            "v1.0",
            vec![family("Light", &[("NO_INFO", 0), ("RED", 1), ("GREEN", 1)], Some(0))],
        )
        .unwrap();
        assert!(matches!(manifest.validate(), Err(SchemaError::InvalidManifest(_))));
    }

    #[test]
    fn test_validate_sentinel_rules() {
        let nonzero = SchemaManifest::new(
            "v1.0",
            vec![family("Light", &[("NO_INFO", 1), ("RED", 2)], Some(1))],
        )
        .unwrap();
        assert!(nonzero.validate().is_err());

        let undeclared = SchemaManifest::new(
            "v1.0",
            vec![family("Light", &[("OFF", 0), ("RED", 1)], None)],
        )
        .unwrap();
        assert!(undeclared.validate().is_err());

        let no_zero = SchemaManifest::new("v1.0", vec![family("Light", &[("RED", 1)], None)]).unwrap();
        no_zero.validate().unwrap();
    }

    #[test]
    fn test_validate_names() {
        let manifest = SchemaManifest::new(
            "v1.0",
            vec![family("Light", &[("NO_INFO", 0), ("red", 1)], Some(0))],
        )
        .unwrap();
        assert!(manifest.validate().is_err());

        let bad_version = SchemaManifest::new("latest", vec![]).unwrap();
        assert!(matches!(bad_version.validate(), Err(SchemaError::InvalidVersion(_))));
    }
}
