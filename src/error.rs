//! Error types for the perception schema registry

use thiserror::Error;

use crate::registry::Family;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema registry errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Unknown family: {0}")]
    UnknownFamily(String),

    #[error("Unknown symbol '{symbol}' in family {family}")]
    UnknownSymbol { family: Family, symbol: String },

    #[error("Unknown code {code} in family {family}")]
    UnknownCode { family: Family, code: i64 },

    #[error("Unsupported format version {found} (this build understands {supported})")]
    UnsupportedFormatVersion { found: String, supported: String },

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Breaking change detected: {0}")]
    BreakingChange(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl SchemaError {
    /// Whether this error comes from version skew between producer and consumer
    /// rather than from a malformed input.
    pub fn is_version_skew(&self) -> bool {
        matches!(
            self,
            SchemaError::UnknownCode { .. } | SchemaError::UnsupportedFormatVersion { .. }
        )
    }
}
