//! # Validation Pipeline
//!
//! raw bytes → [`Document::parse_slice`] → structural and column-rule validators
//! over the same tree → [`aggregate`].
//!
//! A parse failure short-circuits: neither validator runs and the result
//! holds exactly one parse record. Otherwise both validators always run,
//! so the caller sees every independent problem at once.
//!
//! Calls are independent. The only shared state is the read-only
//! [`SchemaDefinition`], so any number of calls may run concurrently.

use std::sync::Arc;

use crate::columns::validate_columns;
use crate::definition::{SchemaDefinition, SchemaError};
use crate::document::Document;
use crate::structure::validate_structure;
use crate::violation::{aggregate, ValidationResult};

/// Validate one raw payload against `schema` and the column rules.
pub fn validate(schema: &SchemaDefinition, text: &str) -> ValidationResult {
    validate_bytes(schema, text.as_bytes())
}

/// Validate a payload of arbitrary bytes. Content that is not UTF-8 JSON
/// yields the single parse record.
pub fn validate_bytes(schema: &SchemaDefinition, bytes: &[u8]) -> ValidationResult {
    let result = match Document::parse_slice(bytes) {
        Ok(doc) => aggregate(
            Ok(&doc),
            validate_structure(schema, &doc),
            validate_columns(&doc),
        ),
        Err(failure) => {
            tracing::debug!(%failure, "payload is not well-formed JSON");
            aggregate(Err(&failure), Vec::new(), Vec::new())
        }
    };

    let (parse, structural, column_rule) = result.counts();
    tracing::debug!(
        schema = schema.name(),
        parse,
        structural,
        column_rule,
        valid = result.is_valid(),
        "validated payload"
    );
    result
}

/// A cloneable handle around a shared [`SchemaDefinition`].
#[derive(Debug, Clone)]
pub struct DocumentValidator {
    schema: Arc<SchemaDefinition>,
}

impl DocumentValidator {
    pub fn new(schema: SchemaDefinition) -> Self {
        Self {
            schema: Arc::new(schema),
        }
    }

    /// Build a validator around the bundled column-document schema.
    ///
    /// # Errors
    ///
    /// Propagates [`SchemaError`] from [`SchemaDefinition::bundled`].
    pub fn bundled() -> Result<Self, SchemaError> {
        SchemaDefinition::bundled().map(Self::new)
    }

    pub fn schema(&self) -> &SchemaDefinition {
        &self.schema
    }

    /// Validate one raw payload. See [`validate`].
    pub fn validate(&self, text: &str) -> ValidationResult {
        validate(&self.schema, text)
    }

    /// Validate a payload of arbitrary bytes. See [`validate_bytes`].
    pub fn validate_bytes(&self, bytes: &[u8]) -> ValidationResult {
        validate_bytes(&self.schema, bytes)
    }
}

impl From<Arc<SchemaDefinition>> for DocumentValidator {
    fn from(schema: Arc<SchemaDefinition>) -> Self {
        Self { schema }
    }
}
