//! # colcheck-schema — Column Document Validation
//!
//! Validates JSON documents that describe tabular columns against two
//! layers of rules and reports every problem in one result:
//!
//! - **Structural** (`structure`): a JSON Schema (Draft 2020-12) compiled
//!   once into a [`SchemaDefinition`] and shared read-only across calls.
//! - **Column rules** (`columns`): for each element of the `Columns`
//!   array, datatype compatibility of `possible_values` and regex syntax of
//!   `conditions.pattern`.
//!
//! [`validate`] runs the whole pipeline: parse, both layers, then
//! [`aggregate`] into a de-duplicated [`ValidationResult`]. Malformed JSON
//! yields a single parse record and no further checks.
//!
//! ## Crate Policy
//!
//! - Per-call findings are values, never errors. Only schema compilation
//!   returns `Err`, and that happens once at startup.
//! - No I/O during validation. Schema files are read only by
//!   [`SchemaDefinition::from_path`].

pub mod columns;
pub mod definition;
pub mod document;
pub mod structure;
pub mod validate;
pub mod violation;

pub use columns::{validate_columns, Datatype};
pub use definition::{SchemaDefinition, SchemaError, BUNDLED_SCHEMA_NAME};
pub use document::{Document, Node, ParseFailure};
pub use structure::validate_structure;
pub use validate::{validate, validate_bytes, DocumentValidator};
pub use violation::{aggregate, ValidationResult, ViolationRecord, ViolationSource};
