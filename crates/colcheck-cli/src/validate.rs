//! # Validate Subcommand
//!
//! Reads one payload from a file or stdin, validates it against the
//! configured schema and the column rules, and prints the findings.
//!
//! Returns exit code: 0 when the document is valid, 1 when violations were
//! found, 2 on operational error (unreadable input, broken schema).

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colcheck_schema::{DocumentValidator, ValidationResult};

use crate::config::{load_schema, Config, OutputFormat};

/// Arguments for the `colcheck validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Document to validate. Reads stdin when omitted or `-`.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Schema document; overrides the config file and the bundled schema.
    #[arg(long, value_name = "SCHEMA")]
    pub schema: Option<PathBuf>,

    /// Output format; overrides the config file.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs, config: &Config) -> Result<u8> {
    let schema = load_schema(config.schema_path(args.schema.as_deref()))?;
    let validator = DocumentValidator::new(schema);

    let payload = read_payload(args.path.as_deref())?;
    let result = validator.validate_bytes(&payload);

    let format = config.output_format(args.format);
    let stdout = std::io::stdout();
    write_result(&mut stdout.lock(), &result, format)?;

    Ok(if result.is_valid() { 0 } else { 1 })
}

/// Read the raw payload from `path`, or from stdin for `None` and `-`.
///
/// Bytes are passed through undecoded; encoding problems are reported as
/// parse violations, not as read errors.
pub fn read_payload(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(p) if p != Path::new("-") => {
            std::fs::read(p).with_context(|| format!("cannot read document {}", p.display()))
        }
        _ => {
            let mut payload = Vec::new();
            std::io::stdin()
                .read_to_end(&mut payload)
                .context("cannot read document from stdin")?;
            Ok(payload)
        }
    }
}

/// Render `result` in the requested format.
pub fn write_result(
    out: &mut impl Write,
    result: &ValidationResult,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            if result.is_valid() {
                writeln!(out, "OK")?;
            } else {
                for message in result.messages() {
                    writeln!(out, "FAIL: {message}")?;
                }
                writeln!(out, "\n{} violation(s) found.", result.len())?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, result)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str, format: OutputFormat) -> String {
        let validator = DocumentValidator::bundled().unwrap();
        let result = validator.validate(text);
        let mut out = Vec::new();
        write_result(&mut out, &result, format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_text_output_for_valid_document() {
        assert_eq!(render(r#"{"Columns": []}"#, OutputFormat::Text), "OK\n");
    }

    #[test]
    fn test_text_output_lists_every_violation() {
        let rendered = render(
            r#"{"Columns":[{"datatype":"integer","possible_values":["1","x"]},{"datatype":"string","conditions":{"pattern":"(("}}]}"#,
            OutputFormat::Text,
        );
        assert!(rendered.contains("FAIL: Value x does not match datatype integer"));
        assert!(rendered.contains("FAIL: Invalid regex pattern: (("));
        assert!(rendered.contains("2 violation(s) found."));
    }

    #[test]
    fn test_json_output_is_machine_readable() {
        let rendered = render("{ broken", OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["valid"], false);
        assert_eq!(value["violations"].as_array().unwrap().len(), 1);
        assert_eq!(value["violations"][0]["source"], "parse");
    }

    #[test]
    fn test_read_payload_from_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{"Columns": []}"#).unwrap();
        assert_eq!(read_payload(Some(file.path())).unwrap(), br#"{"Columns": []}"#);
    }

    #[test]
    fn test_run_validate_non_utf8_document_is_a_violation() {
        let doc = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(doc.path(), b"{\"Columns\": [\xff\xfe]}").unwrap();
        let args = ValidateArgs {
            path: Some(doc.path().to_path_buf()),
            schema: None,
            format: None,
        };
        assert_eq!(run_validate(&args, &Config::default()).unwrap(), 1);

        let payload = read_payload(Some(doc.path())).unwrap();
        let result = DocumentValidator::bundled().unwrap().validate_bytes(&payload);
        assert_eq!(result.counts(), (1, 0, 0));
    }

    #[test]
    fn test_read_payload_missing_file_is_an_error() {
        let err = read_payload(Some(Path::new("/nonexistent/doc.json"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/doc.json"));
    }

    #[test]
    fn test_run_validate_reports_exit_codes() {
        let valid = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(valid.path(), r#"{"Columns": []}"#).unwrap();
        let invalid = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(invalid.path(), r#"{"Columns": [{"datatype": "float", "possible_values": ["1"]}]}"#).unwrap();

        let config = Config::default();
        let args = |path: &Path| ValidateArgs {
            path: Some(path.to_path_buf()),
            schema: None,
            format: None,
        };
        assert_eq!(run_validate(&args(valid.path()), &config).unwrap(), 0);
        assert_eq!(run_validate(&args(invalid.path()), &config).unwrap(), 1);
    }

    #[test]
    fn test_run_validate_fails_on_broken_schema() {
        let schema = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(schema.path(), r#"{"type": 12}"#).unwrap();
        let doc = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(doc.path(), "{}").unwrap();

        let args = ValidateArgs {
            path: Some(doc.path().to_path_buf()),
            schema: Some(schema.path().to_path_buf()),
            format: None,
        };
        assert!(run_validate(&args, &Config::default()).is_err());
    }
}
