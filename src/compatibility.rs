//! Snapshot compatibility checking
//!
//! Families are append-only: a new snapshot may add codes and families, but
//! a published code must keep its value and its meaning. This module diffs
//! two manifests and classifies every change.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::manifest::{FamilyManifest, SchemaManifest};

/// Result of a compatibility check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityResult {
    /// Whether consumers of the old snapshot can read data of the new one
    pub is_compatible: bool,
    /// Whether any change is breaking
    pub is_breaking: bool,
    /// Whether the new snapshot bumps the major version
    pub major_bump: bool,
    /// List of changes detected
    pub changes: Vec<SchemaChange>,
    /// Summary of the compatibility check
    pub summary: String,
}

impl CompatibilityResult {
    fn from_changes(changes: Vec<SchemaChange>, major_bump: bool) -> Self {
        let breaking = changes.iter().filter(|c| c.is_breaking).count();
        let summary = if changes.is_empty() {
            "No changes detected".to_string()
        } else if breaking == 0 {
            format!("{} compatible changes detected", changes.len())
        } else if major_bump {
            format!("{} breaking changes, covered by a major version bump", breaking)
        } else {
            format!("{} breaking changes without a major version bump", breaking)
        };

        Self {
            is_compatible: breaking == 0,
            is_breaking: breaking > 0,
            major_bump,
            changes,
            summary,
        }
    }

    /// Whether the new snapshot may be published: either nothing breaks or
    /// the major version was bumped
    pub fn is_acceptable(&self) -> bool {
        !self.is_breaking || self.major_bump
    }

    /// Turn an unacceptable result into `BreakingChange`
    pub fn into_result(self) -> Result<Self> {
        if self.is_acceptable() {
            Ok(self)
        } else {
            Err(SchemaError::BreakingChange(self.summary))
        }
    }

    pub fn breaking_changes(&self) -> impl Iterator<Item = &SchemaChange> {
        self.changes.iter().filter(|c| c.is_breaking)
    }
}

/// A detected change between two snapshots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaChange {
    /// Type of change
    pub change_type: ChangeType,
    /// Family the change applies to, `None` for version-level changes
    pub family: Option<String>,
    /// Old value (if applicable)
    pub old_value: Option<String>,
    /// New value (if applicable)
    pub new_value: Option<String>,
    /// Whether this change is breaking
    pub is_breaking: bool,
    /// Human-readable description
    pub description: String,
}

/// Type of snapshot change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    FamilyAdded,
    FamilyRemoved,
    /// A new code was appended to a family
    CodeAdded,
    /// A published code disappeared
    CodeRemoved,
    /// A published symbol now carries a different code
    CodeReassigned,
    /// A published code now carries a different symbol
    SymbolRenamed,
    /// A published code was handed to a new symbol after its old symbol moved
    CodeReused,
    /// The family's sentinel moved or vanished
    SentinelChanged,
    /// Content changed but the version tag did not
    VersionNotBumped,
    /// The new version tag is lower than the old one
    VersionDowngraded,
}

impl ChangeType {
    /// Check if this change type is breaking for existing consumers
    pub fn is_typically_breaking(&self) -> bool {
        !matches!(self, ChangeType::FamilyAdded | ChangeType::CodeAdded)
    }
}

/// Compatibility checker for snapshots
#[derive(Debug, Default)]
pub struct CompatibilityChecker {
    /// Strict mode - any change is considered breaking
    strict_mode: bool,
}

impl CompatibilityChecker {
    /// Create a new compatibility checker
    pub fn new() -> Self {
        Self { strict_mode: false }
    }

    /// Enable strict mode
    pub fn strict(mut self) -> Self {
        self.strict_mode = true;
        self
    }

    /// Compare an old snapshot against a new one.
    ///
    /// Both snapshots must pass [`SchemaManifest::validate`] first, so every
    /// code and symbol is unique within its family.
    pub fn check(&self, old: &SchemaManifest, new: &SchemaManifest) -> Result<CompatibilityResult> {
        old.validate()?;
        new.validate()?;

        let old_version = old.version()?;
        let new_version = new.version()?;
        let mut changes = Vec::new();

        for old_family in &old.families {
            match new.family(&old_family.name) {
                Some(new_family) => self.diff_family(old_family, new_family, &mut changes),
                None => changes.push(self.change(
                    ChangeType::FamilyRemoved,
                    Some(&old_family.name),
                    Some(old_family.name.clone()),
                    None,
                    format!("Family '{}' was removed", old_family.name),
                )),
            }
        }

        for new_family in &new.families {
            if old.family(&new_family.name).is_none() {
                changes.push(self.change(
                    ChangeType::FamilyAdded,
                    Some(&new_family.name),
                    None,
                    Some(new_family.name.clone()),
                    format!("Family '{}' was added", new_family.name),
                ));
            }
        }

        if new_version < old_version {
            changes.push(self.change(
                ChangeType::VersionDowngraded,
                None,
                Some(old_version.to_string()),
                Some(new_version.to_string()),
                format!("Version went backwards from {} to {}", old_version, new_version),
            ));
        } else if new_version == old_version && !changes.is_empty() {
            changes.push(self.change(
                ChangeType::VersionNotBumped,
                None,
                Some(old_version.to_string()),
                Some(new_version.to_string()),
                format!("Content changed but version stayed at {}", new_version),
            ));
        }

        debug!(
            old = %old_version,
            new = %new_version,
            changes = changes.len(),
            "compared snapshots"
        );

        Ok(CompatibilityResult::from_changes(
            changes,
            new_version.is_major_bump_from(&old_version),
        ))
    }

    fn diff_family(&self, old: &FamilyManifest, new: &FamilyManifest, changes: &mut Vec<SchemaChange>) {
        let family = Some(old.name.as_str());

        for member in &old.members {
            let symbol_at_code = new.symbol_of(member.code);
            let code_of_symbol = new.code_of(&member.symbol);

            match (symbol_at_code, code_of_symbol) {
                (Some(symbol), _) if symbol == member.symbol => {}
                (_, Some(code)) => changes.push(self.change(
                    ChangeType::CodeReassigned,
                    family,
                    Some(member.code.to_string()),
                    Some(code.to_string()),
                    format!(
                        "{}::{} moved from code {} to {}",
                        old.name, member.symbol, member.code, code
                    ),
                )),
                (Some(symbol), None) => changes.push(self.change(
                    ChangeType::SymbolRenamed,
                    family,
                    Some(member.symbol.clone()),
                    Some(symbol.to_string()),
                    format!(
                        "{} code {} renamed from {} to {}",
                        old.name, member.code, member.symbol, symbol
                    ),
                )),
                (None, None) => changes.push(self.change(
                    ChangeType::CodeRemoved,
                    family,
                    Some(format!("{}={}", member.symbol, member.code)),
                    None,
                    format!("{}::{} (code {}) was removed", old.name, member.symbol, member.code),
                )),
            }
        }

        for member in &new.members {
            if old.symbol_of(member.code) == Some(member.symbol.as_str()) {
                continue;
            }
            // Moved symbols are already reported as CodeReassigned above.
            if old.code_of(&member.symbol).is_some() {
                continue;
            }

            match old.symbol_of(member.code) {
                None => changes.push(self.change(
                    ChangeType::CodeAdded,
                    family,
                    None,
                    Some(format!("{}={}", member.symbol, member.code)),
                    format!("{}::{} added with code {}", old.name, member.symbol, member.code),
                )),
                // Renames are already reported as SymbolRenamed above.
                Some(previous) if new.code_of(previous).is_none() => {}
                Some(previous) => changes.push(self.change(
                    ChangeType::CodeReused,
                    family,
                    Some(format!("{}={}", previous, member.code)),
                    Some(format!("{}={}", member.symbol, member.code)),
                    format!(
                        "{} code {} was {} and is now reused for {}",
                        old.name, member.code, previous, member.symbol
                    ),
                )),
            }
        }

        if old.sentinel != new.sentinel {
            changes.push(self.change(
                ChangeType::SentinelChanged,
                family,
                old.sentinel.map(|c| c.to_string()),
                new.sentinel.map(|c| c.to_string()),
                format!("{} sentinel changed from {:?} to {:?}", old.name, old.sentinel, new.sentinel),
            ));
        }
    }

    fn change(
        &self,
        change_type: ChangeType,
        family: Option<&str>,
        old_value: Option<String>,
        new_value: Option<String>,
        description: String,
    ) -> SchemaChange {
        SchemaChange {
            change_type,
            family: family.map(String::from),
            old_value,
            new_value,
            is_breaking: self.strict_mode || change_type.is_typically_breaking(),
            description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::MemberEntry;

    fn with_family_edit(version: &str, edit: impl FnOnce(&mut FamilyManifest)) -> SchemaManifest {
        let current = SchemaManifest::current().unwrap();
        let mut families = current.families.clone();
        let index = families
            .iter()
            .position(|f| f.name == "ObjectClassification")
            .unwrap();
        edit(&mut families[index]);
        SchemaManifest::new(version, families).unwrap()
    }

    #[test]
    fn test_identical_snapshots() {
        let a = SchemaManifest::current().unwrap();
        let b = SchemaManifest::current().unwrap();
        let result = CompatibilityChecker::new().check(&a, &b).unwrap();
        assert!(result.is_compatible);
        assert!(result.changes.is_empty());
    }

    #[test]
    fn test_append_is_compatible() {
        let old = SchemaManifest::current().unwrap();
        let new = with_family_edit("v1.4", |f| {
            f.members.push(MemberEntry { symbol: "ANIMAL".into(), code: 16 })
        });

        let result = CompatibilityChecker::new().check(&old, &new).unwrap();
        assert!(result.is_compatible);
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].change_type, ChangeType::CodeAdded);

        let strict = CompatibilityChecker::new().strict().check(&old, &new).unwrap();
        assert!(strict.is_breaking);
    }

    #[test]
    fn test_append_without_bump() {
        let old = SchemaManifest::current().unwrap();
        let new = with_family_edit("v1.3", |f| {
            f.members.push(MemberEntry { symbol: "ANIMAL".into(), code: 16 })
        });

        let result = CompatibilityChecker::new().check(&old, &new).unwrap();
        assert!(result.is_breaking);
        assert!(result
            .breaking_changes()
            .any(|c| c.change_type == ChangeType::VersionNotBumped));
    }

    #[test]
    fn test_removal_is_breaking() {
        let old = SchemaManifest::current().unwrap();
        let new = with_family_edit("v1.4", |f| f.members.retain(|m| m.symbol != "TRUCK"));

        let result = CompatibilityChecker::new().check(&old, &new).unwrap();
        assert!(result.is_breaking);
        assert!(!result.is_acceptable());
        assert_eq!(result.changes[0].change_type, ChangeType::CodeRemoved);
        assert!(matches!(result.into_result(), Err(SchemaError::BreakingChange(_))));
    }

    #[test]
    fn test_reassignment_and_rename() {
        let old = SchemaManifest::current().unwrap();
        let new = with_family_edit("v1.4", |f| {
            for member in &mut f.members {
                if member.symbol == "PEDESTRIAN" {
                    member.code = 20;
                }
                if member.symbol == "BICYCLE" {
                    member.symbol = "CYCLIST".into();
                }
            }
        });

        let result = CompatibilityChecker::new().check(&old, &new).unwrap();
        let kinds: Vec<_> = result.changes.iter().map(|c| c.change_type).collect();
        assert!(kinds.contains(&ChangeType::CodeReassigned));
        assert!(kinds.contains(&ChangeType::SymbolRenamed));
        assert!(!kinds.contains(&ChangeType::CodeAdded));
    }

    #[test]
    fn test_major_bump_accepts_breaking() {
        let old = SchemaManifest::current().unwrap();
        let new = with_family_edit("v2.0", |f| {
            f.members.retain(|m| m.code != 0);
            f.sentinel = None;
        });

        let result = CompatibilityChecker::new().check(&old, &new).unwrap();
        assert!(result.is_breaking);
        assert!(result.major_bump);
        assert!(result.is_acceptable());
    }

    #[test]
    fn test_family_removed_and_downgrade() {
        let old = SchemaManifest::current().unwrap();
        let mut families = old.families.clone();
        families.retain(|f| f.name != "SensorModality");
        let new = SchemaManifest::new("v1.2", families).unwrap();

        let result = CompatibilityChecker::new().check(&old, &new).unwrap();
        let kinds: Vec<_> = result.changes.iter().map(|c| c.change_type).collect();
        assert!(kinds.contains(&ChangeType::FamilyRemoved));
        assert!(kinds.contains(&ChangeType::VersionDowngraded));
    }

    #[test]
    fn test_colliding_code_is_rejected() {
        let old = SchemaManifest::current().unwrap();
        let new = with_family_edit("v1.3", |f| {
            f.members.push(MemberEntry { symbol: "ANIMAL".into(), code: 4 })
        });

        let err = CompatibilityChecker::new().check(&old, &new).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidManifest(ref msg) if msg.contains("code 4")));

        // An invalid old snapshot is rejected too.
        let err = CompatibilityChecker::new().check(&new, &old).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidManifest(_)));
    }

    #[test]
    fn test_code_reused_after_move() {
        let old = SchemaManifest::current().unwrap();
        let new = with_family_edit("v1.4", |f| {
            for member in &mut f.members {
                if member.symbol == "PEDESTRIAN" {
                    member.code = 20;
                }
            }
            f.members.push(MemberEntry { symbol: "ANIMAL".into(), code: 4 });
        });

        let result = CompatibilityChecker::new().check(&old, &new).unwrap();
        let kinds: Vec<_> = result.changes.iter().map(|c| c.change_type).collect();
        assert!(kinds.contains(&ChangeType::CodeReassigned));
        assert!(kinds.contains(&ChangeType::CodeReused));
        assert!(!kinds.contains(&ChangeType::CodeAdded));
        assert!(!result.is_acceptable());
    }
}
