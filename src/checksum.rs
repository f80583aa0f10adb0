//! Checksum utilities for snapshot integrity verification

use sha2::{Digest, Sha256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SHA256 checksum of a schema snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Compute checksum from a JSON value.
    ///
    /// Object keys serialize in sorted order, so equal values always hash
    /// the same regardless of how they were built.
    pub fn from_json(value: &serde_json::Value) -> Self {
        Self::from_bytes(value.to_string().as_bytes())
    }

    /// Get the hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Verify that JSON value matches this checksum
    pub fn verify_json(&self, value: &serde_json::Value) -> bool {
        *self == Self::from_json(value)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Checksum {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Checksum {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_checksum_consistency() {
        let a = Checksum::from_json(&json!({"symbol": "CAR", "code": 1}));
        let b = Checksum::from_json(&json!({"code": 1, "symbol": "CAR"}));
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_checksum_different_content() {
        let a = Checksum::from_json(&json!({"symbol": "CAR", "code": 1}));
        let b = Checksum::from_json(&json!({"symbol": "CAR", "code": 2}));
        assert_ne!(a, b);
    }

    #[test]
    fn test_checksum_verification() {
        let value = json!(["LIDAR", "CAMERA"]);
        let checksum = Checksum::from_json(&value);
        assert!(checksum.verify_json(&value));
        assert!(!checksum.verify_json(&json!(["LIDAR"])));
    }
}
