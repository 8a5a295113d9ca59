//! # Violations and Result Aggregation
//!
//! A [`ViolationRecord`] is one independently reported reason a document
//! fails validation. Records are immutable values; the only way to build
//! one is through the per-source constructors, which guarantee a non-empty
//! message.
//!
//! [`aggregate`] folds the outputs of the parser and both validators into a
//! [`ValidationResult`]: a de-duplicated set with deterministic iteration
//! order. Identical `(source, message, location)` triples collapse to one
//! entry, so the same broken value seen in several columns is reported once.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::document::{Document, ParseFailure};

const UNSPECIFIED_MESSAGE: &str = "unspecified violation";

/// Which layer produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSource {
    /// The payload was not well-formed JSON.
    Parse,
    /// The document does not conform to the schema definition.
    Structural,
    /// A column failed a datatype, allowed-value or pattern-syntax rule.
    ColumnRule,
}

impl fmt::Display for ViolationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViolationSource::Parse => "parse",
            ViolationSource::Structural => "structural",
            ViolationSource::ColumnRule => "column-rule",
        })
    }
}

/// One reported problem.
///
/// Field order matters: the derived `Ord` sorts by source first, so a
/// result lists parse, then structural, then column-rule findings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ViolationRecord {
    source: ViolationSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    message: String,
}

impl ViolationRecord {
    fn new(source: ViolationSource, message: String, location: Option<String>) -> Self {
        let message = if message.trim().is_empty() {
            UNSPECIFIED_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            source,
            location: location.filter(|l| !l.is_empty()),
            message,
        }
    }

    /// The single record describing a parse failure.
    pub fn parse(failure: &ParseFailure) -> Self {
        Self::new(ViolationSource::Parse, failure.to_string(), None)
    }

    /// A schema non-conformance at `location` (a JSON Pointer; empty for the root).
    pub fn structural(message: impl Into<String>, location: impl Into<String>) -> Self {
        Self::new(
            ViolationSource::Structural,
            message.into(),
            Some(location.into()),
        )
    }

    /// A column rule failure.
    pub fn column_rule(message: impl Into<String>) -> Self {
        Self::new(ViolationSource::ColumnRule, message.into(), None)
    }

    pub fn source(&self) -> ViolationSource {
        self.source
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

impl fmt::Display for ViolationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            ViolationSource::Parse => write!(f, "Failed to parse JSON: {}", self.message),
            ViolationSource::Structural => match &self.location {
                Some(loc) => write!(f, "Schema Validation Error: {loc}: {}", self.message),
                None => write!(f, "Schema Validation Error: {}", self.message),
            },
            ViolationSource::ColumnRule => f.write_str(&self.message),
        }
    }
}

/// The outcome of validating one payload. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    violations: BTreeSet<ViolationRecord>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Records in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ViolationRecord> {
        self.violations.iter()
    }

    /// Records produced by one layer.
    pub fn by_source(&self, source: ViolationSource) -> impl Iterator<Item = &ViolationRecord> {
        self.violations.iter().filter(move |v| v.source == source)
    }

    /// Rendered messages, one per record.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }

    /// Number of records per source as `(parse, structural, column_rule)`.
    pub fn counts(&self) -> (usize, usize, usize) {
        self.violations
            .iter()
            .fold((0, 0, 0), |(p, s, c), v| match v.source {
                ViolationSource::Parse => (p + 1, s, c),
                ViolationSource::Structural => (p, s + 1, c),
                ViolationSource::ColumnRule => (p, s, c + 1),
            })
    }
}

impl FromIterator<ViolationRecord> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = ViolationRecord>>(iter: I) -> Self {
        Self {
            violations: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ValidationResult {
    type Item = &'a ViolationRecord;
    type IntoIter = std::collections::btree_set::Iter<'a, ViolationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ValidationResult", 2)?;
        state.serialize_field("valid", &self.is_valid())?;
        state.serialize_field("violations", &self.violations)?;
        state.end()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Merge the parse outcome and both validators' findings.
///
/// A parse failure short-circuits: the result holds exactly that one
/// record and the validator outputs are ignored (callers do not run the
/// validators without a tree; see [`crate::validate::validate`]).
pub fn aggregate<S, C>(
    parsed: Result<&Document, &ParseFailure>,
    structural: S,
    column_rule: C,
) -> ValidationResult
where
    S: IntoIterator<Item = ViolationRecord>,
    C: IntoIterator<Item = ViolationRecord>,
{
    match parsed {
        Err(failure) => std::iter::once(ViolationRecord::parse(failure)).collect(),
        Ok(_) => structural.into_iter().chain(column_rule).collect(),
    }
}
