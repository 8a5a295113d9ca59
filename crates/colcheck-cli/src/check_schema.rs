//! # Check-Schema Subcommand
//!
//! Compiles a schema document and reports whether it is usable. Intended as
//! a readiness check: a schema that fails here would also prevent
//! `colcheck validate` from starting.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::config::{load_schema, Config};

/// Arguments for the `colcheck check-schema` subcommand.
#[derive(Args, Debug)]
pub struct CheckSchemaArgs {
    /// Schema document to compile; the configured or bundled schema when omitted.
    #[arg(value_name = "SCHEMA")]
    pub schema: Option<PathBuf>,
}

/// Execute the check-schema subcommand.
///
/// Returns exit code 0 when the schema compiles. Compilation failures are
/// returned as errors and reported by the caller.
pub fn run_check_schema(args: &CheckSchemaArgs, config: &Config) -> Result<u8> {
    let schema = load_schema(config.schema_path(args.schema.as_deref()))?;
    println!("OK: {}", schema.name());
    Ok(0)
}
