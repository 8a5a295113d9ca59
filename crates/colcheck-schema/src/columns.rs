//! # Column Rule Validator
//!
//! Walks the `Columns` array of a document and applies the column-level
//! rules to every element:
//!
//! 1. Each entry of `possible_values` must be compatible with the column's
//!    `datatype` tag.
//! 2. `conditions.pattern`, when present and non-empty, must compile as a
//!    regular expression. Look-around and backreferences are accepted. The
//!    pattern is checked for syntax only; it is never matched against
//!    values here.
//!
//! Every check is a pure function returning at most one record. A missing
//! or non-array `Columns` field yields nothing; presence is the structural
//! layer's concern.
//!
//! Records carry no location, so the same finding in two columns collapses
//! to one entry when results are aggregated.

use std::fmt;

use serde_json::Value;

use crate::document::{value_text, Document, Node};
use crate::violation::ViolationRecord;

/// Field holding the column array.
pub const COLUMNS_FIELD: &str = "Columns";

/// Compiled-size ceiling for pattern checks. Large counted repetitions
/// such as `a{1000}{1000}` are valid syntax and must fit under it.
const PATTERN_SIZE_LIMIT: usize = 256 * (1 << 20);

/// A column's declared datatype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Datatype {
    /// Whole numbers in the signed 32-bit range.
    Integer,
    /// Any text.
    String,
    /// A tag with no compatibility rule. Every value is rejected.
    Unknown(String),
}

impl Datatype {
    /// Interpret a datatype tag. Matching is exact and case-sensitive.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "integer" => Datatype::Integer,
            "string" => Datatype::String,
            other => Datatype::Unknown(other.to_string()),
        }
    }

    /// Whether `value` can be read as an instance of this datatype.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Datatype::Integer => value.parse::<i32>().is_ok(),
            Datatype::String => true,
            Datatype::Unknown(_) => false,
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datatype::Integer => f.write_str("integer"),
            Datatype::String => f.write_str("string"),
            Datatype::Unknown(tag) => f.write_str(tag),
        }
    }
}

/// Apply the column rules to every element of the document's `Columns` array.
pub fn validate_columns(doc: &Document) -> Vec<ViolationRecord> {
    let Some(columns) = doc.root().get(COLUMNS_FIELD).as_array() else {
        tracing::trace!("no Columns array; column rules skipped");
        return Vec::new();
    };

    let violations: Vec<ViolationRecord> = columns
        .iter()
        .enumerate()
        .flat_map(|(index, column)| {
            tracing::trace!(index, "checking column");
            validate_column(Node::Present(column))
        })
        .collect();

    tracing::debug!(
        columns = columns.len(),
        count = violations.len(),
        "column rule validation finished"
    );
    violations
}

/// Apply the column rules to a single column node.
pub fn validate_column(column: Node<'_>) -> Vec<ViolationRecord> {
    let datatype = Datatype::from_tag(&column.get("datatype").as_text());

    let value_violations = column
        .get("possible_values")
        .as_array()
        .unwrap_or_default()
        .iter()
        .filter_map(|value| check_value(value, &datatype));

    let pattern_violation = check_pattern(column.get("conditions").get("pattern"));

    value_violations.chain(pattern_violation).collect()
}

/// Datatype compatibility of one allowed value.
pub fn check_value(value: &Value, datatype: &Datatype) -> Option<ViolationRecord> {
    let text = value_text(value);
    if datatype.accepts(&text) {
        None
    } else {
        Some(ViolationRecord::column_rule(format!(
            "Value {text} does not match datatype {datatype}"
        )))
    }
}

/// Regex syntax of a column's `conditions.pattern`.
pub fn check_pattern(pattern: Node<'_>) -> Option<ViolationRecord> {
    let pattern = pattern.as_text();
    if pattern.is_empty() {
        return None;
    }
    match fancy_regex::RegexBuilder::new(&pattern)
        .delegate_size_limit(PATTERN_SIZE_LIMIT)
        .build()
    {
        Ok(_) => None,
        Err(e) => {
            tracing::trace!(%pattern, error = %e, "pattern failed to compile");
            Some(ViolationRecord::column_rule(format!(
                "Invalid regex pattern: {pattern}"
            )))
        }
    }
}
