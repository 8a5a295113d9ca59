//! # colcheck CLI entry point
//!
//! Parses command-line arguments, installs logging, loads the optional
//! configuration file and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use colcheck_cli::check_schema::{run_check_schema, CheckSchemaArgs};
use colcheck_cli::config::Config;
use colcheck_cli::validate::{run_validate, ValidateArgs};

/// Exit code for operational errors (unreadable input, broken schema).
const EXIT_ERROR: u8 = 2;

/// colcheck — validate column description documents.
///
/// Checks a JSON document against a structural schema and the column rules
/// (datatype compatibility of allowed values, regex pattern syntax) and
/// reports every violation found.
#[derive(Parser, Debug)]
#[command(name = "colcheck", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a document against the schema and the column rules.
    Validate(ValidateArgs),

    /// Compile a schema document and report whether it is usable.
    CheckSchema(CheckSchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("colcheck v{} starting", env!("CARGO_PKG_VERSION"));

    let result = Config::load_optional(cli.config.as_deref()).and_then(|config| {
        match cli.command {
            Commands::Validate(args) => run_validate(&args, &config),
            Commands::CheckSchema(args) => run_check_schema(&args, &config),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
