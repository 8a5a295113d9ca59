//! # Structural Validator
//!
//! Checks a parsed [`Document`] against a [`SchemaDefinition`]. Every
//! independent breach is reported, not just the first, in the order the
//! schema compiler traverses the instance.
//!
//! This layer knows only the generic schema grammar (types, required
//! fields, nesting). Column semantics such as datatype compatibility live
//! in [`crate::columns`].

use crate::definition::SchemaDefinition;
use crate::document::Document;
use crate::violation::ViolationRecord;

/// Validate `doc` against `schema`, one record per schema error.
///
/// The record location is the JSON Pointer of the offending instance;
/// errors at the document root carry no location.
pub fn validate_structure(schema: &SchemaDefinition, doc: &Document) -> Vec<ViolationRecord> {
    let violations: Vec<ViolationRecord> = schema
        .validator()
        .iter_errors(doc.as_value())
        .map(|e| ViolationRecord::structural(e.to_string(), e.instance_path.to_string()))
        .collect();

    tracing::debug!(
        schema = schema.name(),
        count = violations.len(),
        "structural validation finished"
    );
    violations
}
