// Author: Dustin Pilgrim
// License: MIT

use serde_json::json;

use crate::ast::{Body, Document, Element, StringFormat, Value};
use crate::serializer::parse_file;
use crate::OclError;

/// Export an OCL document to JSON.
///
/// Bodies become arrays of entries so that order and repeated names (two
/// sibling `step` blocks, say) survive:
///
/// ```json
/// [
///   { "attribute": "name", "value": "web" },
///   { "block": "step", "labels": ["build"], "body": [ ... ] }
/// ]
/// ```
///
/// Heredoc strings are exported as `{"heredoc": "...", "tag": "EOT",
/// "indented": false}` so the literal form is not lost.
///
/// # Examples
/// ```
/// use ocl_cfg::{export, parse};
///
/// # fn main() -> Result<(), ocl_cfg::OclError> {
/// let doc = parse("port = 8080")?;
/// let json = export::export_document_to_json(&doc)?;
/// assert!(json.contains("\"attribute\": \"port\""));
/// # Ok(())
/// # }
/// ```
pub fn export_document_to_json(doc: &Document) -> Result<String, OclError> {
    serde_json::to_string_pretty(&body_to_json(doc.body())).map_err(|e| OclError::ConversionError {
        message: format!("Failed to render JSON: {}", e),
        hint: None,
        code: Some(420),
    })
}

fn body_to_json(body: &Body) -> serde_json::Value {
    serde_json::Value::Array(body.iter().map(element_to_json).collect())
}

fn element_to_json(element: &Element) -> serde_json::Value {
    match element {
        Element::Attribute(a) => json!({
            "attribute": a.name(),
            "value": value_to_json(a.value()),
        }),
        Element::Block(b) => json!({
            "block": b.name(),
            "labels": b.labels(),
            "body": body_to_json(b.body()),
        }),
    }
}

fn value_to_json(v: &Value) -> serde_json::Value {
    match v {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => json!(b),
        // Outside the i64/u64 range JSON numbers lose precision; keep the digits
        Value::Integer(n) => match (i64::try_from(*n), u64::try_from(*n)) {
            (Ok(n), _) => json!(n),
            (_, Ok(n)) => json!(n),
            _ => json!(n.to_string()),
        },
        Value::Float(f) => json!(f),
        Value::String(s) if s.format() == StringFormat::SingleLine => json!(s.value()),
        Value::String(s) => json!({
            "heredoc": s.value(),
            "tag": s.heredoc_tag(),
            "indented": s.format() == StringFormat::IndentedHeredoc,
        }),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
    }
}

/// Export an OCL file directly to JSON.
///
/// # Errors
/// Returns an error if the file can't be read or contains invalid OCL.
pub fn export_ocl_file(path: &str) -> Result<String, OclError> {
    let doc = parse_file(path)?;
    export_document_to_json(&doc)
}
