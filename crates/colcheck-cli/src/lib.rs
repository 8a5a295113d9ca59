//! # colcheck-cli — Command-Line Front End
//!
//! Wraps `colcheck-schema` for use from shells and CI pipelines.
//!
//! ## Subcommands
//!
//! - `colcheck validate [PATH]` — validate a document (stdin when omitted).
//! - `colcheck check-schema [SCHEMA]` — compile a schema and report readiness.
//!
//! ```bash
//! colcheck validate table.json
//! colcheck validate --schema columns.schema.json --format json < table.json
//! colcheck --config colcheck.yaml check-schema
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers in this crate.
//! - Handlers delegate to `colcheck-schema`; no validation logic here.
//! - Results go to stdout, logs to stderr.

pub mod check_schema;
pub mod config;
pub mod validate;
