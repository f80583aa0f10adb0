//! Schema Registry
//!
//! Immutable, process-wide name↔code tables for every perception family,
//! plus the format version of the snapshot as a whole.
//!
//! The tables are `'static` data derived from the typed enums in
//! [`crate::types`]; there is no API to add or remove codes at runtime.

use std::fmt;
use std::str::FromStr;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::UnknownCodePolicy;
use crate::error::{Result, SchemaError};
use crate::types::{
    CodedEnum, MeasState, MovementClassification, ObjectClassification, PerceptionType,
    SensorModality, TrackingPoint,
};
use crate::version::FORMAT_VERSION;

/// An enumeration family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Family {
    MeasState,
    MovementClassification,
    ObjectClassification,
    PerceptionType,
    SensorModality,
    TrackingPoint,
}

impl Family {
    /// All families in registry order
    pub const ALL: [Family; 6] = [
        Family::MeasState,
        Family::MovementClassification,
        Family::ObjectClassification,
        Family::PerceptionType,
        Family::SensorModality,
        Family::TrackingPoint,
    ];

    /// Canonical name (e.g. `"ObjectClassification"`)
    pub fn name(&self) -> &'static str {
        match self {
            Family::MeasState => "MeasState",
            Family::MovementClassification => "MovementClassification",
            Family::ObjectClassification => "ObjectClassification",
            Family::PerceptionType => "PerceptionType",
            Family::SensorModality => "SensorModality",
            Family::TrackingPoint => "TrackingPoint",
        }
    }

    /// The family's table in the global registry
    pub fn table(&self) -> &'static FamilyTable {
        REGISTRY.family(*self)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = SchemaError;

    /// Accepts the canonical name in any case, with or without `_`/`-`
    /// separators (`ObjectClassification`, `object_classification`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        Family::ALL
            .iter()
            .find(|family| family.name().to_lowercase() == normalized)
            .copied()
            .ok_or_else(|| SchemaError::UnknownFamily(s.to_string()))
    }
}

/// Name↔code table of a single family
#[derive(Debug)]
pub struct FamilyTable {
    pub family: Family,
    /// `(symbol, code)` pairs in declaration order, which is ascending by code
    pub members: &'static [(&'static str, u8)],
    /// Code of the "no information" member, if the family has one
    pub sentinel: Option<u8>,
}

impl FamilyTable {
    const fn of<T: CodedEnum>() -> Self {
        Self {
            family: T::FAMILY,
            members: T::MEMBERS,
            sentinel: T::SENTINEL_CODE,
        }
    }

    pub fn code_of(&self, symbol: &str) -> Option<u8> {
        self.members
            .iter()
            .find(|(name, _)| *name == symbol)
            .map(|(_, code)| *code)
    }

    pub fn symbol_of(&self, code: i64) -> Option<&'static str> {
        self.members
            .iter()
            .find(|(_, c)| i64::from(*c) == code)
            .map(|(name, _)| *name)
    }

    /// Sentinel as `(symbol, code)`
    pub fn sentinel_member(&self) -> Option<(&'static str, u8)> {
        let code = self.sentinel?;
        self.symbol_of(i64::from(code)).map(|symbol| (symbol, code))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.members.iter().map(|(name, _)| *name)
    }
}

/// The full set of families plus the format version
#[derive(Debug)]
pub struct SchemaRegistry {
    families: [FamilyTable; 6],
    format_version: &'static str,
}

/// The registry of this build
pub static REGISTRY: SchemaRegistry = SchemaRegistry {
    families: [
        FamilyTable::of::<MeasState>(),
        FamilyTable::of::<MovementClassification>(),
        FamilyTable::of::<ObjectClassification>(),
        FamilyTable::of::<PerceptionType>(),
        FamilyTable::of::<SensorModality>(),
        FamilyTable::of::<TrackingPoint>(),
    ],
    format_version: FORMAT_VERSION,
};

impl SchemaRegistry {
    /// The process-wide registry
    pub fn global() -> &'static SchemaRegistry {
        &REGISTRY
    }

    /// All family tables in registry order
    pub fn families(&self) -> &[FamilyTable] {
        &self.families
    }

    pub fn family(&self, family: Family) -> &FamilyTable {
        // Tables are stored in `Family::ALL` order.
        &self.families[family as usize]
    }

    /// Look up the code of `symbol` in `family`
    pub fn lookup_by_name(&self, family: Family, symbol: &str) -> Result<u8> {
        self.family(family)
            .code_of(symbol)
            .ok_or_else(|| SchemaError::UnknownSymbol {
                family,
                symbol: symbol.to_string(),
            })
    }

    /// Look up the symbol of `code` in `family`
    pub fn lookup_by_code(&self, family: Family, code: i64) -> Result<&'static str> {
        self.family(family)
            .symbol_of(code)
            .ok_or(SchemaError::UnknownCode { family, code })
    }

    /// Look up the symbol of `code`, mapping unknown codes to the family
    /// sentinel. Families without a sentinel still fail with `UnknownCode`.
    pub fn decode_lenient(&self, family: Family, code: i64) -> Result<&'static str> {
        match self.lookup_by_code(family, code) {
            Err(err @ SchemaError::UnknownCode { .. }) => match self.sentinel(family) {
                Some((symbol, _)) => {
                    debug!(%family, code, sentinel = symbol, "unknown code, falling back to sentinel");
                    Ok(symbol)
                }
                None => Err(err),
            },
            other => other,
        }
    }

    /// Decode `code` according to a configured policy
    pub fn decode_with(
        &self,
        family: Family,
        code: i64,
        policy: UnknownCodePolicy,
    ) -> Result<&'static str> {
        match policy {
            UnknownCodePolicy::Fallback => self.decode_lenient(family, code),
            UnknownCodePolicy::Reject => self.lookup_by_code(family, code),
        }
    }

    /// The "no information" member of `family`, if any
    pub fn sentinel(&self, family: Family) -> Option<(&'static str, u8)> {
        self.family(family).sentinel_member()
    }

    /// Format version tag of this snapshot (e.g. `"v1.3"`)
    pub fn format_version(&self) -> &'static str {
        self.format_version
    }

    /// Closest member symbol to a misspelled `query`, for error messages
    pub fn suggest_symbol(&self, family: Family, query: &str) -> Option<&'static str> {
        let matcher = SkimMatcherV2::default().ignore_case();
        let query = query.replace(['-', ' '], "_");

        self.family(family)
            .symbols()
            .filter_map(|symbol| matcher.fuzzy_match(symbol, &query).map(|score| (score, symbol)))
            .max_by_key(|(score, _)| *score)
            .map(|(_, symbol)| symbol)
    }
}

/// Look up the code of `symbol` in `family` in the global registry
pub fn lookup_by_name(family: Family, symbol: &str) -> Result<u8> {
    REGISTRY.lookup_by_name(family, symbol)
}

/// Look up the symbol of `code` in `family` in the global registry
pub fn lookup_by_code(family: Family, code: i64) -> Result<&'static str> {
    REGISTRY.lookup_by_code(family, code)
}

/// Format version tag of the global registry
pub fn current_format_version() -> &'static str {
    REGISTRY.format_version()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_in_family_order() {
        for (index, family) in Family::ALL.iter().enumerate() {
            assert_eq!(REGISTRY.families()[index].family, *family);
        }
    }

    #[test]
    fn test_members_ascend_by_code() {
        for table in REGISTRY.families() {
            assert!(
                table.members.windows(2).all(|pair| pair[0].1 < pair[1].1),
                "{} is not declared in code order",
                table.family
            );
        }
    }

    #[test]
    fn test_family_from_str() {
        assert_eq!("ObjectClassification".parse::<Family>().unwrap(), Family::ObjectClassification);
        assert_eq!("object_classification".parse::<Family>().unwrap(), Family::ObjectClassification);
        assert_eq!("TRACKING-POINT".parse::<Family>().unwrap(), Family::TrackingPoint);
        assert!(matches!("Weather".parse::<Family>(), Err(SchemaError::UnknownFamily(_))));
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(REGISTRY.sentinel(Family::PerceptionType), Some(("NOT_PROVIDED", 0)));
        assert_eq!(REGISTRY.sentinel(Family::MovementClassification), Some(("NO_INFO", 0)));
        assert_eq!(REGISTRY.sentinel(Family::SensorModality), None);
    }

    #[test]
    fn test_decode_with_policy() {
        assert_eq!(
            REGISTRY.decode_with(Family::TrackingPoint, 42, UnknownCodePolicy::Fallback).unwrap(),
            "UNKNOWN"
        );
        assert!(REGISTRY
            .decode_with(Family::TrackingPoint, 42, UnknownCodePolicy::Reject)
            .is_err());
    }

    #[test]
    fn test_suggest_symbol() {
        assert_eq!(
            REGISTRY.suggest_symbol(Family::ObjectClassification, "pedstrian"),
            Some("PEDESTRIAN")
        );
        assert_eq!(
            REGISTRY.suggest_symbol(Family::SensorModality, "radar lr"),
            Some("RADAR_LR")
        );
    }
}
