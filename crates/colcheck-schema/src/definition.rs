//! # Schema Definition
//!
//! The compiled structural rules, built once at startup and shared
//! read-only by every validation call.
//!
//! ## Lifecycle
//!
//! A [`SchemaDefinition`] is constructed from a schema document (a file,
//! a string, or the bundled default) and never changes afterwards. It is
//! `Send + Sync`; wrap it in an `Arc` to share it across threads. There is
//! no per-call re-reading or re-compiling.
//!
//! ## Failure Semantics
//!
//! A malformed schema is a startup failure, reported as [`SchemaError`].
//! Callers should refuse to serve rather than run without structural rules.
//!
//! ## Reference Resolution
//!
//! Schemas must be self-contained. Internal `$ref`s (`#/$defs/...`) are
//! resolved by the jsonschema crate natively; any reference that would
//! require retrieval fails compilation instead of reaching the network.

use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::{Draft, Retrieve, Uri, Validator};
use serde_json::Value;
use thiserror::Error;

/// Name reported for the schema compiled into the crate.
pub const BUNDLED_SCHEMA_NAME: &str = "columns.schema.json";

const BUNDLED_SCHEMA: &str = include_str!("../schemas/columns.schema.json");

/// The schema document could not be turned into a [`SchemaDefinition`].
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema file could not be read.
    #[error("cannot read schema '{}': {source}", path.display())]
    Io {
        /// Path of the schema file.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The schema text is not valid JSON.
    #[error("schema '{schema_name}' is not valid JSON: {reason}")]
    InvalidJson {
        /// Schema filename or identifier.
        schema_name: String,
        /// Parser error.
        reason: String,
    },

    /// The schema is valid JSON but does not compile.
    #[error("schema '{schema_name}' failed to compile: {reason}")]
    Compile {
        /// Schema filename or identifier.
        schema_name: String,
        /// Reason reported by the schema compiler.
        reason: String,
    },
}

/// Rejects every retrieval so schemas stay self-contained.
struct NoRemoteRetriever;

impl Retrieve for NoRemoteRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external schema reference '{}' is not allowed", uri.as_str()).into())
    }
}

/// An immutable, compiled structural schema.
pub struct SchemaDefinition {
    name: String,
    source: Value,
    validator: Validator,
}

impl fmt::Debug for SchemaDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDefinition")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl SchemaDefinition {
    /// Compile an already-parsed schema document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Compile`] if the document is not a valid
    /// Draft 2020-12 schema or references an external schema.
    pub fn from_value(name: impl Into<String>, source: Value) -> Result<Self, SchemaError> {
        let name = name.into();
        let mut opts = jsonschema::options();
        opts.with_draft(Draft::Draft202012);
        opts.with_retriever(NoRemoteRetriever);

        let validator = opts.build(&source).map_err(|e| SchemaError::Compile {
            schema_name: name.clone(),
            reason: e.to_string(),
        })?;

        tracing::info!(schema = %name, "compiled schema definition");
        Ok(Self {
            name,
            source,
            validator,
        })
    }

    /// Parse and compile a schema from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidJson`] or [`SchemaError::Compile`].
    pub fn from_json_str(name: impl Into<String>, text: &str) -> Result<Self, SchemaError> {
        let name = name.into();
        let source: Value = serde_json::from_str(text).map_err(|e| SchemaError::InvalidJson {
            schema_name: name.clone(),
            reason: e.to_string(),
        })?;
        Self::from_value(name, source)
    }

    /// Load and compile a schema file.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Io`] if the file cannot be read, otherwise
    /// the errors of [`SchemaDefinition::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(path.display().to_string(), &text)
    }

    /// The default column-document schema compiled into the crate.
    ///
    /// # Errors
    ///
    /// Only if the bundled document itself is broken, which the crate's
    /// tests rule out.
    pub fn bundled() -> Result<Self, SchemaError> {
        Self::from_json_str(BUNDLED_SCHEMA_NAME, BUNDLED_SCHEMA)
    }

    /// File name or identifier the schema was loaded under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The schema document as loaded.
    pub fn source(&self) -> &Value {
        &self.source
    }

    pub(crate) fn validator(&self) -> &Validator {
        &self.validator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_bundled_schema_compiles() {
        let schema = SchemaDefinition::bundled().unwrap();
        assert_eq!(schema.name(), BUNDLED_SCHEMA_NAME);
        assert_eq!(schema.source()["type"], "object");
    }

    #[test]
    fn test_bundled_schema_does_not_enumerate_datatypes() {
        let schema = SchemaDefinition::bundled().unwrap();
        let datatype = &schema.source()["$defs"]["column"]["properties"]["datatype"];
        assert_eq!(datatype["type"], "string");
        assert!(datatype.get("enum").is_none());
    }

    #[test]
    fn test_definition_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SchemaDefinition>();
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let err = SchemaDefinition::from_json_str("broken.json", "{ not json").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidJson { .. }), "got: {err}");
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_invalid_schema_keyword_fails_compilation() {
        let err = SchemaDefinition::from_value("bad", json!({"type": "not-a-type"})).unwrap_err();
        assert!(matches!(err, SchemaError::Compile { .. }), "got: {err}");
    }

    #[test]
    fn test_external_reference_fails_compilation() {
        let err = SchemaDefinition::from_value(
            "remote",
            json!({"$ref": "https://schemas.example.invalid/other.schema.json"}),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::Compile { .. }), "got: {err}");
    }

    #[test]
    fn test_internal_reference_resolves() {
        let schema = SchemaDefinition::from_value(
            "local-ref",
            json!({
                "$defs": {"name": {"type": "string"}},
                "properties": {"name": {"$ref": "#/$defs/name"}}
            }),
        );
        assert!(schema.is_ok(), "{:?}", schema.err());
    }

    #[test]
    fn test_from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"type": "object", "required": ["Columns"]}}"#).unwrap();
        let schema = SchemaDefinition::from_path(file.path()).unwrap();
        assert_eq!(schema.source()["required"][0], "Columns");
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = SchemaDefinition::from_path("/nonexistent/columns.schema.json").unwrap_err();
        assert!(matches!(err, SchemaError::Io { .. }), "got: {err}");
    }

    #[test]
    fn test_debug_omits_compiled_state() {
        let schema = SchemaDefinition::bundled().unwrap();
        let rendered = format!("{schema:?}");
        assert!(rendered.contains(BUNDLED_SCHEMA_NAME));
    }
}
