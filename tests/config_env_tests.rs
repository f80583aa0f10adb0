//! Environment Layering Tests
//!
//! Kept in a separate test binary with a single test: it mutates the process
//! environment, which would race with tests reading config in parallel.

use perception_schemas::{SchemaConfig, UnknownCodePolicy, VersionPolicy};

#[test]
fn test_env_overrides_file_and_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[decode]\nunknown_codes = \"fallback\"\n").unwrap();

    std::env::set_var("PERCEPTION_SCHEMAS__DECODE__UNKNOWN_CODES", "reject");
    std::env::set_var("PERCEPTION_SCHEMAS__DECODE__VERSION_POLICY", "exact");
    std::env::set_var("PERCEPTION_SCHEMAS__EXPORT__HEADER_PREFIX", "ADAS");

    let config = SchemaConfig::load_from(Some(path.to_str().unwrap()));

    std::env::remove_var("PERCEPTION_SCHEMAS__DECODE__UNKNOWN_CODES");
    std::env::remove_var("PERCEPTION_SCHEMAS__DECODE__VERSION_POLICY");
    std::env::remove_var("PERCEPTION_SCHEMAS__EXPORT__HEADER_PREFIX");

    let config = config.unwrap();
    assert_eq!(config.decode.unknown_codes, UnknownCodePolicy::Reject);
    assert_eq!(config.decode.version_policy, VersionPolicy::Exact);
    assert_eq!(config.export.header_prefix, "ADAS");
    assert_eq!(config.export.header_source, "perception-schemas");

    let defaults = SchemaConfig::load_from(Some(path.to_str().unwrap())).unwrap();
    assert_eq!(defaults.decode.unknown_codes, UnknownCodePolicy::Fallback);
    assert_eq!(defaults.decode.version_policy, VersionPolicy::AllowNewerMinor);
}
