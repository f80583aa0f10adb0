//! Schema Export CLI
//!
//! Writes the generated artifacts of this build: the C++ header and the JSON
//! manifest. The registry tables are the source of truth; the artifacts are
//! never edited by hand.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use perception_schemas::codegen::{render_cpp_header, render_json, HeaderConfig};
use perception_schemas::{SchemaConfig, SchemaManifest};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, ValueEnum)]
enum Artifact {
    Header,
    Json,
    All,
}

#[derive(Parser)]
#[command(name = "schema-export")]
#[command(about = "Generate the C++ header and JSON manifest for the perception taxonomy")]
struct Cli {
    /// Config file to load (optional)
    #[arg(short, long)]
    config: Option<String>,

    /// Artifact to generate
    #[arg(short, long, value_enum, default_value = "all")]
    format: Artifact,

    /// Output directory (defaults to export.output_dir from config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print to stdout instead of writing files
    #[arg(long)]
    stdout: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = SchemaConfig::load_from(cli.config.as_deref()).context("loading configuration")?;
    let manifest = SchemaManifest::current()?;
    manifest.validate().context("registry snapshot failed validation")?;

    let mut artifacts = Vec::new();
    if matches!(cli.format, Artifact::Header | Artifact::All) {
        let header = render_cpp_header(&manifest, &HeaderConfig::from(&config.export));
        artifacts.push(("perception_types.h", header));
    }
    if matches!(cli.format, Artifact::Json | Artifact::All) {
        artifacts.push(("manifest.json", render_json(&manifest, config.export.output_format)?));
    }

    if cli.stdout {
        for (_, content) in &artifacts {
            print!("{}", content);
        }
        return Ok(());
    }

    let output_dir = cli.output.unwrap_or_else(|| config.output_dir());
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    for (name, content) in &artifacts {
        let path = output_dir.join(name);
        fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "wrote artifact");
        println!("✅ {}", path.display());
    }

    println!("\nFormat version {} (checksum {})", manifest.format_version, manifest.checksum);
    Ok(())
}
