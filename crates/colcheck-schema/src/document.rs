//! # Document Parser
//!
//! Turns raw payload text into a navigable [`Document`] tree. Parsing is
//! all-or-nothing: malformed input yields a single [`ParseFailure`] and no
//! partial tree.
//!
//! Navigation never fails. Missing keys, out-of-range indices and lookups
//! on the wrong node kind all resolve to [`Node::Absent`], so validators
//! test presence with a `match` rather than with error handling.

use serde_json::Value;
use thiserror::Error;

/// The input text is not well-formed JSON.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{cause} at line {line} column {column}")]
pub struct ParseFailure {
    /// Lexical or structural cause reported by the parser.
    pub cause: String,
    /// 1-based line of the failure (0 when the input ended early).
    pub line: usize,
    /// 1-based column of the failure.
    pub column: usize,
}

impl From<serde_json::Error> for ParseFailure {
    fn from(e: serde_json::Error) -> Self {
        // serde_json appends " at line L column C" to its Display output;
        // keep the bare cause so the position is not reported twice.
        let rendered = e.to_string();
        let cause = match rendered.rfind(" at line ") {
            Some(idx) => rendered[..idx].to_string(),
            None => rendered,
        };
        Self {
            cause,
            line: e.line(),
            column: e.column(),
        }
    }
}

/// A parsed input document, owned by a single validation call.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Parse `text` as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ParseFailure`] if `text` is not well-formed JSON.
    pub fn parse(text: &str) -> Result<Self, ParseFailure> {
        Self::parse_slice(text.as_bytes())
    }

    /// Parse raw bytes as JSON. Invalid UTF-8 is a [`ParseFailure`] like
    /// any other malformed input.
    ///
    /// # Errors
    ///
    /// Returns [`ParseFailure`] if `bytes` are not well-formed UTF-8 JSON.
    pub fn parse_slice(bytes: &[u8]) -> Result<Self, ParseFailure> {
        let root = serde_json::from_slice(bytes)?;
        Ok(Self { root })
    }

    /// Wrap an already-parsed value.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// The root node.
    pub fn root(&self) -> Node<'_> {
        Node::Present(&self.root)
    }

    /// The underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Resolve a path expression such as `Columns[2].datatype`.
    ///
    /// Keys are separated by `.`, array indices are written `[n]`. An empty
    /// path addresses the root. Any path that cannot be resolved, including
    /// a syntactically malformed one, yields [`Node::Absent`].
    pub fn at(&self, path: &str) -> Node<'_> {
        match parse_path(path) {
            Some(segments) => segments
                .iter()
                .fold(self.root(), |node, segment| match segment {
                    Segment::Key(key) => node.get(key),
                    Segment::Index(i) => node.index(*i),
                }),
            None => Node::Absent,
        }
    }
}

/// A node of a [`Document`], or the explicit absence of one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    Present(&'a Value),
    Absent,
}

impl<'a> Node<'a> {
    /// Child of an object node by key.
    pub fn get(self, key: &str) -> Node<'a> {
        match self {
            Node::Present(Value::Object(map)) => map.get(key).map_or(Node::Absent, Node::Present),
            _ => Node::Absent,
        }
    }

    /// Element of an array node by position.
    pub fn index(self, i: usize) -> Node<'a> {
        match self {
            Node::Present(Value::Array(items)) => items.get(i).map_or(Node::Absent, Node::Present),
            _ => Node::Absent,
        }
    }

    pub fn is_present(self) -> bool {
        matches!(self, Node::Present(_))
    }

    pub fn value(self) -> Option<&'a Value> {
        match self {
            Node::Present(v) => Some(v),
            Node::Absent => None,
        }
    }

    /// Elements of an array node; `None` for any other node.
    pub fn as_array(self) -> Option<&'a [Value]> {
        match self {
            Node::Present(Value::Array(items)) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Textual coercion of a scalar node.
    ///
    /// Strings are returned verbatim, numbers and booleans in their JSON
    /// text, `null` as `"null"`. Objects, arrays and absent nodes coerce to
    /// the empty string.
    pub fn as_text(self) -> String {
        match self {
            Node::Present(v) => value_text(v),
            Node::Absent => String::new(),
        }
    }
}

/// Textual coercion of a JSON value; see [`Node::as_text`].
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}

#[derive(Debug, PartialEq)]
enum Segment {
    Key(String),
    Index(usize),
}

fn parse_path(path: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    if path.is_empty() {
        return Some(segments);
    }
    for part in path.split('.') {
        let (key, mut rest) = match part.find('[') {
            Some(idx) => part.split_at(idx),
            None => (part, ""),
        };
        if key.is_empty() && rest.is_empty() {
            return None;
        }
        if !key.is_empty() {
            segments.push(Segment::Key(key.to_string()));
        }
        while !rest.is_empty() {
            let close = rest.find(']')?;
            let index = rest.get(1..close)?.parse().ok()?;
            segments.push(Segment::Index(index));
            rest = &rest[close + 1..];
            if !rest.is_empty() && !rest.starts_with('[') {
                return None;
            }
        }
    }
    Some(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_well_formed_document() {
        let doc = Document::parse(r#"{"Columns": []}"#).unwrap();
        assert_eq!(doc.as_value(), &json!({"Columns": []}));
    }

    #[test]
    fn test_parse_malformed_document_reports_position() {
        let err = Document::parse("{\"Columns\": [\n  {\"datatype\": }\n]}").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.column > 0);
        assert!(!err.cause.contains(" at line "), "position leaked into cause: {err:?}");
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_empty_input_fails() {
        assert!(Document::parse("").is_err());
        assert!(Document::parse("   ").is_err());
    }

    #[test]
    fn test_parse_slice_rejects_invalid_utf8() {
        let err = Document::parse_slice(b"{\"Columns\": [\xff\xfe]}").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(Document::parse_slice(b"{\"name\": \"\xff\"}").is_err());
    }

    #[test]
    fn test_parse_slice_accepts_utf8_bytes() {
        let doc = Document::parse_slice("{\"name\": \"Stra\u{df}e\"}".as_bytes()).unwrap();
        assert_eq!(doc.at("name").as_text(), "Stra\u{df}e");
    }

    #[test]
    fn test_parse_trailing_garbage_fails() {
        assert!(Document::parse("{} {}").is_err());
    }

    #[test]
    fn test_path_resolves_nested_fields() {
        let doc = Document::from_value(json!({
            "Columns": [
                {"datatype": "integer"},
                {"datatype": "string", "conditions": {"pattern": "^a$"}}
            ]
        }));
        assert_eq!(doc.at("Columns[0].datatype").as_text(), "integer");
        assert_eq!(doc.at("Columns[1].conditions.pattern").as_text(), "^a$");
        assert_eq!(doc.at("").value(), Some(doc.as_value()));
    }

    #[test]
    fn test_unknown_paths_resolve_to_absent() {
        let doc = Document::from_value(json!({"Columns": [{"datatype": "integer"}]}));
        assert_eq!(doc.at("Columns[5].datatype"), Node::Absent);
        assert_eq!(doc.at("Columns.datatype"), Node::Absent);
        assert_eq!(doc.at("Rows[0]"), Node::Absent);
        assert_eq!(doc.at("Columns[0].datatype.inner"), Node::Absent);
    }

    #[test]
    fn test_malformed_paths_resolve_to_absent() {
        let doc = Document::from_value(json!({"Columns": [{"datatype": "integer"}]}));
        assert_eq!(doc.at("Columns[x]"), Node::Absent);
        assert_eq!(doc.at("Columns[0"), Node::Absent);
        assert_eq!(doc.at("Columns..x"), Node::Absent);
        assert_eq!(doc.at("Columns[0]x"), Node::Absent);
    }

    #[test]
    fn test_nested_indices_resolve() {
        let doc = Document::from_value(json!({"grid": [[1, 2], [3, 4]]}));
        assert_eq!(doc.at("grid[1][0]").as_text(), "3");
    }

    #[test]
    fn test_text_coercion() {
        assert_eq!(value_text(&json!("abc")), "abc");
        assert_eq!(value_text(&json!(42)), "42");
        assert_eq!(value_text(&json!(1.5)), "1.5");
        assert_eq!(value_text(&json!(true)), "true");
        assert_eq!(value_text(&json!(null)), "null");
        assert_eq!(value_text(&json!([1])), "");
        assert_eq!(value_text(&json!({"a": 1})), "");
        assert_eq!(Node::Absent.as_text(), "");
    }

    #[test]
    fn test_as_array_only_for_arrays() {
        let doc = Document::from_value(json!({"a": [1, 2], "b": "x"}));
        assert_eq!(doc.at("a").as_array().map(<[Value]>::len), Some(2));
        assert!(doc.at("b").as_array().is_none());
        assert!(doc.at("c").as_array().is_none());
    }
}
