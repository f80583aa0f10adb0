//! Perception Schema Registry CLI
//!
//! Inspect families, look up symbols and codes, and check payload versions.

use clap::{Parser, Subcommand};
use perception_schemas::{
    check_payload_version, Family, SchemaConfig, SchemaError, SchemaRegistry, UnknownCodePolicy,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "perception-schemas")]
#[command(about = "Versioned, append-only perception taxonomy registry")]
struct Cli {
    /// Config file to load (optional)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all families
    Families,

    /// Show all members of a family
    Show {
        /// Family name (e.g. "ObjectClassification" or "object_classification")
        family: String,
    },

    /// Look up the code of a symbol
    Lookup {
        family: String,
        symbol: String,
    },

    /// Decode a wire code into its symbol
    Decode {
        family: String,
        #[arg(allow_negative_numbers = true)]
        code: i64,
        /// Map unknown codes to the family sentinel
        #[arg(long, conflicts_with = "strict")]
        lenient: bool,
        /// Fail on unknown codes
        #[arg(long)]
        strict: bool,
    },

    /// Print the format version of this build
    Version,

    /// Check whether a payload version can be decoded
    CheckVersion {
        /// Payload version tag (e.g. "v1.3")
        tag: String,
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

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let registry = SchemaRegistry::global();

    match cli.command {
        Commands::Families => {
            println!("📚 Families (format {})\n", registry.format_version());
            for table in registry.families() {
                let sentinel = match table.sentinel_member() {
                    Some((symbol, code)) => format!("sentinel {}={}", symbol, code),
                    None => "no sentinel".to_string(),
                };
                println!(
                    "  {:<24} {:>2} codes  ({})",
                    table.family.name(),
                    table.members.len(),
                    sentinel
                );
            }
            Ok(())
        }

        Commands::Show { family } => {
            let family: Family = family.parse()?;
            let table = registry.family(family);

            println!("📋 {}\n", family);
            for (symbol, code) in table.members {
                let marker = if table.sentinel == Some(*code) { "  (sentinel)" } else { "" };
                println!("  {:>3}  {}{}", code, symbol, marker);
            }
            Ok(())
        }

        Commands::Lookup { family, symbol } => {
            let family: Family = family.parse()?;

            match registry.lookup_by_name(family, &symbol) {
                Ok(code) => {
                    println!("{}", code);
                    Ok(())
                }
                Err(err @ SchemaError::UnknownSymbol { .. }) => {
                    if let Some(suggestion) = registry.suggest_symbol(family, &symbol) {
                        eprintln!("💡 Did you mean {}?", suggestion);
                    }
                    Err(err.into())
                }
                Err(err) => Err(err.into()),
            }
        }

        Commands::Decode { family, code, lenient, strict } => {
            let family: Family = family.parse()?;

            let policy = if lenient {
                UnknownCodePolicy::Fallback
            } else if strict {
                UnknownCodePolicy::Reject
            } else {
                SchemaConfig::load_from(cli.config.as_deref())?.decode.unknown_codes
            };

            let symbol = registry.decode_with(family, code, policy)?;
            println!("{}", symbol);
            Ok(())
        }

        Commands::Version => {
            println!("{}", registry.format_version());
            Ok(())
        }

        Commands::CheckVersion { tag } => {
            let config = SchemaConfig::load_from(cli.config.as_deref())?;
            let version = check_payload_version(&tag, config.decode.version_policy)?;
            println!(
                "✅ {} is readable by {} ({:?})",
                version,
                registry.format_version(),
                config.decode.version_policy
            );
            Ok(())
        }
    }
}
