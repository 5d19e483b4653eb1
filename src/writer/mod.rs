// Author: Dustin Pilgrim
// License: MIT

use crate::ast::{Attribute, Block, Body, Document, Element, StringFormat, StringLiteral, Value};
use crate::options::FormatOptions;
use crate::OclError;

/// Renders document model trees as canonical OCL text.
///
/// A writer is one session over one sink: it tracks the current indent and
/// whether the previous sibling was a block to decide where blank lines go.
/// Create a new writer per tree.
pub struct Writer<'a> {
    out: &'a mut String,
    options: &'a FormatOptions,
    current_indent: usize,
    is_first_line: bool,
    last_was_block: bool,
}

impl<'a> Writer<'a> {
    pub fn new(out: &'a mut String, options: &'a FormatOptions) -> Self {
        Self {
            out,
            options,
            current_indent: 0,
            is_first_line: true,
            last_was_block: false,
        }
    }

    pub fn write_document(&mut self, document: &Document) -> Result<(), OclError> {
        self.write_body(document.body())
    }

    pub fn write_body(&mut self, body: &Body) -> Result<(), OclError> {
        for element in body {
            self.write_element(element)?;
        }
        Ok(())
    }

    pub fn write_element(&mut self, element: &Element) -> Result<(), OclError> {
        match element {
            Element::Attribute(attribute) => self.write_attribute(attribute),
            Element::Block(block) => self.write_block(block),
        }
    }

    pub fn write_attribute(&mut self, attribute: &Attribute) -> Result<(), OclError> {
        self.write_next_line();
        self.write_indent();
        let name = write_identifier(attribute.name())?;
        self.out.push_str(&name);
        self.out.push_str(" = ");
        self.write_value(attribute.value())
    }

    pub fn write_block(&mut self, block: &Block) -> Result<(), OclError> {
        self.write_next_line();
        self.write_indent();
        let name = write_identifier(block.name())?;
        self.out.push_str(&name);

        for label in block.labels() {
            self.out.push(' ');
            self.out.push_str(&quote(label));
        }

        self.out.push_str(" {");

        self.current_indent += self.options.indent_depth;
        for child in block.body() {
            self.write_element(child)?;
        }
        self.current_indent -= self.options.indent_depth;

        self.out.push('\n');
        self.write_indent();
        self.out.push('}');

        self.last_was_block = true;
        Ok(())
    }

    fn write_next_line(&mut self) {
        if !self.is_first_line {
            self.out.push('\n');
        }
        if self.last_was_block {
            self.out.push('\n');
        }
        self.is_first_line = false;
        self.last_was_block = false;
    }

    fn write_indent(&mut self) {
        for _ in 0..self.current_indent {
            self.out.push(self.options.indent_char);
        }
    }

    fn write_value(&mut self, value: &Value) -> Result<(), OclError> {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Integer(n) => self.out.push_str(&n.to_string()),
            Value::Float(f) => self.out.push_str(&format_float(*f)?),
            Value::String(literal) => self.write_string_literal(literal)?,
            Value::Array(items) => {
                self.out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    // A closing tag must sit alone on its line, which an array cannot give it
                    if matches!(item, Value::String(lit) if lit.is_heredoc()) {
                        return Err(OclError::unsupported(
                            "heredoc inside an array",
                            Some("Array entries are written as single-line strings"),
                        ));
                    }
                    self.write_value(item)?;
                }
                self.out.push(']');
            }
        }
        Ok(())
    }

    fn write_string_literal(&mut self, literal: &StringLiteral) -> Result<(), OclError> {
        if literal.format() == StringFormat::SingleLine {
            self.out.push_str(&quote(literal.value()));
            return Ok(());
        }

        let indented = literal.format() == StringFormat::IndentedHeredoc;
        let tag = literal
            .heredoc_tag()
            .unwrap_or(&self.options.default_heredoc_tag)
            .to_string();
        check_heredoc_tag(&tag)?;

        self.out.push_str("<<");
        if indented {
            self.out.push('-');
        }
        self.out.push_str(&tag);
        self.out.push('\n');

        for line in literal.value().split('\n') {
            if indented {
                self.write_indent();
            }
            self.out.push_str(line.trim_end_matches('\r'));
            self.out.push('\n');
        }

        if indented {
            self.write_indent();
        }
        self.out.push_str(&tag);
        Ok(())
    }
}

/// Heredoc tags are non-empty runs of letters, digits and `_`.
fn check_heredoc_tag(tag: &str) -> Result<(), OclError> {
    if !tag.is_empty() && tag.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Ok(());
    }
    Err(OclError::InvalidIdentifier {
        identifier: tag.to_string(),
        hint: Some("Heredoc tags may only contain letters, digits and '_'".into()),
        code: Some(503),
    })
}

/// Writes `document` to a fresh string.
pub fn write_to_string(document: &Document, options: &FormatOptions) -> Result<String, OclError> {
    let mut out = String::new();
    Writer::new(&mut out, options).write_document(document)?;
    Ok(out)
}

/// Sanitizes a name for output: anything outside `[A-Za-z0-9_-]` becomes
/// `_` and a leading digit or `-` gets a `_` prefix.
pub fn write_identifier(identifier: &str) -> Result<String, OclError> {
    if identifier.trim().is_empty() {
        return Err(OclError::InvalidIdentifier {
            identifier: identifier.to_string(),
            hint: Some("Attribute and block names cannot be blank".into()),
            code: Some(502),
        });
    }

    let mut out = String::with_capacity(identifier.len() + 1);
    if identifier.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        out.push('_');
    }
    for c in identifier.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    Ok(out)
}

/// Escapes `\`, CR, LF, tab and `"` for a single-line literal.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            other => out.push(other),
        }
    }
    out
}

fn quote(s: &str) -> String {
    format!("\"{}\"", escape(s))
}

fn format_float(f: f64) -> Result<String, OclError> {
    if !f.is_finite() {
        return Err(OclError::unsupported(
            format!("float ({})", f),
            Some("NaN and infinite values have no OCL literal"),
        ));
    }
    // Display never uses exponent notation, so a missing '.' means integral.
    let text = f.to_string();
    if text.contains('.') {
        Ok(text)
    } else {
        Ok(format!("{}.0", text))
    }
}
