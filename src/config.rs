//! Configuration management for perception-schemas
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (perception-schemas.toml)
//! - Environment variables (PERCEPTION_SCHEMAS__*)
//!
//! ## Example config file (perception-schemas.toml):
//! ```toml
//! [decode]
//! unknown_codes = "fallback"
//! version_policy = "allow_newer_minor"
//!
//! [export]
//! output_format = "pretty"
//! output_dir = "generated"
//! header_prefix = "VVM"
//! header_source = "perception-schemas"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::version::VersionPolicy;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SchemaConfig {
    /// Decoding behavior for consumers
    #[serde(default)]
    pub decode: DecodeConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,
}

/// What to do with a code this build does not know
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnknownCodePolicy {
    /// Substitute the family sentinel
    #[default]
    Fallback,
    /// Fail with `UnknownCode`
    Reject,
}

/// Decode configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DecodeConfig {
    #[serde(default)]
    pub unknown_codes: UnknownCodePolicy,

    #[serde(default)]
    pub version_policy: VersionPolicy,
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output format (pretty or compact)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Directory generated artifacts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Prefix for generated C++ type names
    #[serde(default = "default_header_prefix")]
    pub header_prefix: String,

    /// Source named in the generated header banner
    #[serde(default = "default_header_source")]
    pub header_source: String,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("generated")
}

fn default_header_prefix() -> String {
    "VVM".to_string()
}

fn default_header_source() -> String {
    "perception-schemas".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Pretty,
            output_dir: default_output_dir(),
            header_prefix: default_header_prefix(),
            header_source: default_header_source(),
        }
    }
}

impl SchemaConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "perception-schemas.toml",
            ".perception-schemas.toml",
            "config/perception-schemas.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "perception", "perception-schemas") {
            let xdg_config = config_dir.config_dir().join("perception-schemas.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // PERCEPTION_SCHEMAS__DECODE__UNKNOWN_CODES=reject
        builder = builder.add_source(
            Environment::with_prefix("PERCEPTION_SCHEMAS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Output directory (resolves relative paths)
    pub fn output_dir(&self) -> PathBuf {
        if self.export.output_dir.is_absolute() {
            self.export.output_dir.clone()
        } else {
            std::env::current_dir()
                .unwrap_or_default()
                .join(&self.export.output_dir)
        }
    }
}
