//! # conform CLI entry point
//!
//! Parses command-line arguments, initializes logging on stderr and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use conform_cli::check::{run_check, CheckArgs};
use conform_cli::load_options;
use conform_cli::mock::{run_mock, MockArgs};
use conform_cli::normalize::{run_normalize, NormalizeArgs};

/// conform: structural validation and normalization of JSON/YAML documents.
#[derive(Parser, Debug)]
#[command(name = "conform", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to an options file (YAML or JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that a document conforms to a schema.
    Check(CheckArgs),

    /// Print the normalized form of a document.
    Normalize(NormalizeArgs),

    /// Print an example document synthesized from a schema.
    Mock(MockArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!("conform CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = load_options(cli.config.as_deref()).and_then(|options| match &cli.command {
        Commands::Check(args) => run_check(args, &options),
        Commands::Normalize(args) => run_normalize(args, &options),
        Commands::Mock(args) => run_mock(args, &options),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
