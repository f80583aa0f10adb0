//! C++ Header Emitter
//!
//! One `enum class` per family, in manifest order, followed after the
//! `PerceptionType` family by a `PerceptionTypeSpecification` class holding
//! the format version. Without a `PerceptionType` family the class goes last.

use super::HeaderConfig;
use crate::manifest::{FamilyManifest, SchemaManifest};

const SPECIFICATION_ANCHOR: &str = "PerceptionType";

/// Render the whole header
pub fn render_cpp_header(manifest: &SchemaManifest, config: &HeaderConfig) -> String {
    let mut output = String::new();
    output.push_str("#pragma once\n");
    output.push_str(&format!("// auto-generated file from {}\n", config.source));

    let mut specification_emitted = false;
    for family in &manifest.families {
        output.push('\n');
        emit_enum(&mut output, family, &config.prefix);

        if family.name == SPECIFICATION_ANCHOR {
            output.push('\n');
            emit_specification(&mut output, &manifest.format_version, &config.prefix);
            specification_emitted = true;
        }
    }

    if !specification_emitted {
        output.push('\n');
        emit_specification(&mut output, &manifest.format_version, &config.prefix);
    }

    output
}

fn emit_enum(output: &mut String, family: &FamilyManifest, prefix: &str) {
    output.push_str(&format!("enum class {}{} {{\n", prefix, family.name));

    let members: Vec<String> = family
        .members
        .iter()
        .map(|m| format!("  {} = {}", m.symbol, m.code))
        .collect();
    output.push_str(&members.join(",\n"));

    output.push_str("\n};\n");
}

fn emit_specification(output: &mut String, format_version: &str, prefix: &str) {
    output.push_str(&format!("class {}{}Specification {{\n", prefix, SPECIFICATION_ANCHOR));
    output.push_str("public:\n");
    output.push_str(&format!("  const char* FORMAT_VERSION = \"{}\";\n", format_version));
    output.push_str("};\n");
}
