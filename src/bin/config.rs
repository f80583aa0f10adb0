//! Schema Config CLI
//!
//! View and manage perception-schemas configuration.

use clap::{Parser, Subcommand};
use perception_schemas::SchemaConfig;

#[derive(Parser)]
#[command(name = "schema-config")]
#[command(about = "View and manage perception-schemas configuration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current configuration
    Show {
        /// Config file to load (optional)
        #[arg(short, long)]
        config: Option<String>,

        /// Output as TOML
        #[arg(long)]
        toml: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize a new config file
    Init {
        /// Output path
        #[arg(short, long, default_value = "perception-schemas.toml")]
        output: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Show { config, toml, json } => {
            let cfg = SchemaConfig::load_from(config.as_deref())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&cfg)?);
            } else if toml {
                println!("{}", ::toml::to_string_pretty(&cfg)?);
            } else {
                println!("📋 Perception Schemas Configuration\n");
                println!("Decode:");
                println!("  Unknown codes: {:?}", cfg.decode.unknown_codes);
                println!("  Version policy: {:?}", cfg.decode.version_policy);

                println!("\nExport:");
                println!("  Format: {:?}", cfg.export.output_format);
                println!("  Output dir: {:?}", cfg.output_dir());
                println!("  Header prefix: {}", cfg.export.header_prefix);
                println!("  Header source: {}", cfg.export.header_source);
            }
            Ok(())
        }

        Commands::Init { output, force } => {
            if std::path::Path::new(&output).exists() && !force {
                return Err(format!("{} already exists (use --force to overwrite)", output).into());
            }

            SchemaConfig::default().save(&output)?;
            println!("✅ Wrote default configuration to {}", output);
            Ok(())
        }
    }
}
