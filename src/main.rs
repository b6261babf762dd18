//! Command-line interface for xml-variants
//!
//! # Usage Examples
//!
//! ```bash
//! # Generate 50 variants with a fixed seed
//! xml-variants generate --input invoice.xml --out variants/ -n 50 --seed 42
//!
//! # Same run driven by a config file, overriding the count
//! xml-variants generate --input invoice.xml --out variants/ --config variants.yaml -n 10
//!
//! # Dry run of the selector mapping
//! xml-variants inspect --input invoice.xml --map "name=.//Customer/Name"
//! ```
//!
//! Set `RUST_LOG=xml_variants=info,variant_populate=info` for progress logs.

use clap::{Parser, Subcommand};
use variant_populate::{GenerateArgs, InspectArgs};

#[derive(Parser)]
#[command(name = "xml-variants")]
#[command(about = "Generate unique randomized variants of an XML template")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate variant XML files and a CSV manifest
    Generate(GenerateArgs),

    /// Print how many elements each selector matches in the template
    Inspect(InspectArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => {
            let report = xml_variants::generate(&args)?;
            if report.exhausted {
                eprintln!(
                    "Warning: only {} of {} variants are unique after {} attempts; \
                     widen the value space (e.g. --vary-formats) or lower -n",
                    report.accepted, report.requested, report.attempts
                );
            }
            for (key, misses) in &report.selector_misses {
                tracing::warn!("Selector for '{}' matched nothing in {} variants", key, misses);
            }
            println!(
                "Generated {} variants in {:?} (manifest: {})",
                report.accepted,
                report.total_duration,
                report.manifest_path.display()
            );
        }
        Commands::Inspect(args) => {
            let report = xml_variants::inspect(&args)?;
            println!("{}", serde_json::to_string(&report)?);
        }
    }

    Ok(())
}
