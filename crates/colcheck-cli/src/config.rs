//! # Configuration
//!
//! Optional YAML configuration file, passed with `--config`:
//!
//! ```yaml
//! schema: schemas/columns.schema.json
//! format: json
//! ```
//!
//! Command-line flags take precedence over the file; the file takes
//! precedence over the defaults (bundled schema, text output). Relative
//! `schema` paths are resolved against the config file's directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use colcheck_schema::SchemaDefinition;
use serde::Deserialize;

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One rendered message per line.
    #[default]
    Text,
    /// The full result as a JSON object.
    Json,
}

/// Contents of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Schema document to validate against; the bundled schema when unset.
    #[serde(default)]
    pub schema: Option<PathBuf>,

    /// Output format.
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let mut config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        if let (Some(schema), Some(base)) = (config.schema.as_mut(), path.parent()) {
            if schema.is_relative() {
                *schema = base.join(&*schema);
            }
        }

        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Load `path` if given, otherwise the defaults.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Resolve the effective schema path: the flag wins over the file.
    pub fn schema_path<'a>(&'a self, flag: Option<&'a Path>) -> Option<&'a Path> {
        flag.or(self.schema.as_deref())
    }

    /// Resolve the effective output format: the flag wins over the file.
    pub fn output_format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or(self.format).unwrap_or_default()
    }
}

/// Compile the schema at `path`, or the bundled schema when `None`.
pub fn load_schema(path: Option<&Path>) -> Result<SchemaDefinition> {
    match path {
        Some(path) => SchemaDefinition::from_path(path)
            .with_context(|| format!("failed to load schema {}", path.display())),
        None => SchemaDefinition::bundled().context("failed to compile bundled schema"),
    }
}
