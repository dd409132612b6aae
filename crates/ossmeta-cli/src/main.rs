//! # ossmeta CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ossmeta_cli::generate::{run_generate, GenerateArgs};
use ossmeta_cli::inspect::{run_inspect, InspectArgs};

/// Third-party license manifest generator for bundled npm packages.
#[derive(Parser, Debug)]
#[command(name = "ossmeta", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve every package of a bundle and write the license manifest.
    Generate(GenerateArgs),

    /// Resolve one package directory and print its manifest entry.
    Inspect(InspectArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("ossmeta CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let config = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Generate(args) => run_generate(args, config).await,
        Commands::Inspect(args) => run_inspect(args, config).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
