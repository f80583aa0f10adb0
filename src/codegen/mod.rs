//! Code Generation
//!
//! Renders a [`SchemaManifest`] into the artifacts downstream consumers
//! compile against or load:
//! - a C++ header with one `enum class` per family ([`cpp`])
//! - the JSON manifest itself
//!
//! Emitters only see the manifest, never the registry, so a stored snapshot
//! renders exactly like the live one.

pub mod cpp;

use similar::TextDiff;

use crate::config::{ExportConfig, OutputFormat};
use crate::error::Result;
use crate::manifest::SchemaManifest;

pub use cpp::render_cpp_header;

/// Settings for the C++ header emitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderConfig {
    /// Prefix for every generated type name
    pub prefix: String,
    /// Source named in the banner comment
    pub source: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self::from(&ExportConfig::default())
    }
}

impl From<&ExportConfig> for HeaderConfig {
    fn from(export: &ExportConfig) -> Self {
        Self {
            prefix: export.header_prefix.clone(),
            source: export.header_source.clone(),
        }
    }
}

/// Render the manifest as JSON
pub fn render_json(manifest: &SchemaManifest, format: OutputFormat) -> Result<String> {
    manifest.to_json(format)
}

/// Compare a checked-in artifact with a freshly generated one.
///
/// Returns a unified diff, or `None` when both are identical. Line endings
/// are normalized first so a header checked out with CRLF does not count as
/// drift.
pub fn artifact_drift(existing: &str, generated: &str, name: &str) -> Option<String> {
    let existing = existing.replace("\r\n", "\n");
    if existing == generated {
        return None;
    }

    let diff = TextDiff::from_lines(existing.as_str(), generated);
    Some(
        diff.unified_diff()
            .context_radius(3)
            .header(&format!("{} (checked in)", name), &format!("{} (generated)", name))
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_drift() {
        let header = "enum class X {\n  A = 0\n};\n";
        assert!(artifact_drift(header, header, "x.h").is_none());
        assert!(artifact_drift(&header.replace('\n', "\r\n"), header, "x.h").is_none());
    }

    #[test]
    fn test_drift_reports_diff() {
        let old = "enum class X {\n  A = 0\n};\n";
        let new = "enum class X {\n  A = 0,\n  B = 1\n};\n";
        let diff = artifact_drift(old, new, "x.h").unwrap();
        assert!(diff.contains("-  A = 0\n"));
        assert!(diff.contains("+  B = 1\n"));
        assert!(diff.contains("x.h (generated)"));
    }

    #[test]
    fn test_render_json_formats() {
        let manifest = SchemaManifest::current().unwrap();
        let pretty = render_json(&manifest, OutputFormat::Pretty).unwrap();
        let compact = render_json(&manifest, OutputFormat::Compact).unwrap();
        assert!(pretty.contains('\n'));
        assert!(!compact.contains('\n'));
        assert!(compact.contains("\"format_version\":\"v1.3\""));
    }
}
