//! Schema Validator CLI
//!
//! Verifies published manifests, checks compatibility between snapshots and
//! detects drift between a checked-in header and the current registry.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use perception_schemas::codegen::{artifact_drift, render_cpp_header, HeaderConfig};
use perception_schemas::{CompatibilityChecker, SchemaConfig, SchemaManifest};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-validator")]
#[command(about = "Validate snapshots and check compatibility")]
struct Cli {
    /// Config file to load (optional)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify checksum and invariants of a manifest ("current" for this build)
    Verify {
        #[arg(default_value = "current")]
        manifest: String,
    },

    /// Check compatibility between two manifests
    Diff {
        /// Old manifest
        old: PathBuf,
        /// New manifest (defaults to this build)
        new: Option<PathBuf>,
        /// Strict mode - any change is breaking
        #[arg(long)]
        strict: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare a checked-in C++ header with the generated one
    Drift {
        header: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_manifest(name: &str) -> perception_schemas::Result<SchemaManifest> {
    if name == "current" {
        SchemaManifest::current()
    } else {
        SchemaManifest::load(name)
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Verify { manifest } => {
            let loaded = load_manifest(&manifest)?;

            loaded.verify_checksum()?;
            loaded.validate()?;

            println!(
                "✅ {} ({}) - checksum valid, {} families, {} codes",
                manifest, loaded.format_version, loaded.stats.total_families, loaded.stats.total_codes
            );
            Ok(())
        }

        Commands::Diff { old, new, strict, json } => {
            let old_manifest = SchemaManifest::load(&old)?;
            let new_manifest = match new {
                Some(path) => SchemaManifest::load(path)?,
                None => SchemaManifest::current()?,
            };
            for manifest in [&old_manifest, &new_manifest] {
                manifest.verify_checksum()?;
                manifest.validate()?;
            }

            let checker = if strict {
                CompatibilityChecker::new().strict()
            } else {
                CompatibilityChecker::new()
            };
            let result = checker.check(&old_manifest, &new_manifest)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!(
                    "🔍 Checking compatibility: {} -> {}\n",
                    old_manifest.format_version, new_manifest.format_version
                );
                for change in &result.changes {
                    let icon = if change.is_breaking { "❌" } else { "✅" };
                    println!("{} {}", icon, change.description);
                }
                println!();
                println!("{}", result.summary);
            }

            if !result.is_acceptable() {
                std::process::exit(2);
            }
            Ok(())
        }

        Commands::Drift { header } => {
            let config = SchemaConfig::load_from(cli.config.as_deref())?;
            let existing = std::fs::read_to_string(&header)?;
            let generated = render_cpp_header(
                &SchemaManifest::current()?,
                &HeaderConfig::from(&config.export),
            );

            let name = header.display().to_string();
            match artifact_drift(&existing, &generated, &name) {
                None => {
                    println!("✅ No drift detected - {} is in sync", name);
                    Ok(())
                }
                Some(diff) => {
                    println!("{}", diff);
                    eprintln!("❌ {} is out of date - regenerate with schema-export", name);
                    std::process::exit(2);
                }
            }
        }
    }
}
