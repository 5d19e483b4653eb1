// Author: Dustin Pilgrim
// License: MIT

//! The OCL document model.
//!
//! A [`Document`] is a [`Body`] without a name. A body is an ordered list of
//! [`Element`]s, each either an [`Attribute`] (`name = value`) or a nested
//! [`Block`] (`name "label" { ... }`). Nodes are plain values: build them,
//! then write or walk them.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    /// `"quoted"` with escapes
    SingleLine,
    /// `<<TAG` ... `TAG`
    Heredoc,
    /// `<<-TAG` ... `TAG`, content indented to the attribute on write
    IndentedHeredoc,
}

/// A string value together with the literal form it is written in.
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    value: String,
    format: StringFormat,
    heredoc_tag: Option<String>,
}

impl StringLiteral {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            format: StringFormat::SingleLine,
            heredoc_tag: None,
        }
    }

    /// A `<<TAG` heredoc literal. Line separators are normalized to `\n`.
    pub fn heredoc(value: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::tagged(value, StringFormat::Heredoc, tag)
    }

    /// A `<<-TAG` heredoc literal.
    pub fn indented_heredoc(value: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::tagged(value, StringFormat::IndentedHeredoc, tag)
    }

    fn tagged(value: impl Into<String>, format: StringFormat, tag: impl Into<String>) -> Self {
        Self {
            value: value.into().replace("\r\n", "\n"),
            format,
            heredoc_tag: Some(tag.into()),
        }
    }

    /// Replaces the delimiting tag of a heredoc literal. Single-line
    /// literals carry no tag and are returned unchanged.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        if self.is_heredoc() {
            self.heredoc_tag = Some(tag.into());
        }
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn format(&self) -> StringFormat {
        self.format
    }

    pub fn heredoc_tag(&self) -> Option<&str> {
        self.heredoc_tag.as_deref()
    }

    pub fn is_heredoc(&self) -> bool {
        self.format != StringFormat::SingleLine
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

/// A literal attribute value.
///
/// All integer widths share `Integer` and all floating point widths share
/// `Float`; the text format carries no width information.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i128),
    Float(f64),
    String(StringLiteral),
    Array(Vec<Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.value()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(StringLiteral::new(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(StringLiteral::new(s))
    }
}

impl From<StringLiteral> for Value {
    fn from(s: StringLiteral) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    name: String,
    value: Value,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    name: String,
    labels: Vec<String>,
    body: Body,
}

impl Block {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: Vec::new(),
            body: Body::new(),
        }
    }

    pub fn with_parts(name: impl Into<String>, labels: Vec<String>, body: Body) -> Self {
        Self {
            name: name.into(),
            labels,
            body,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn child(mut self, element: impl Into<Element>) -> Self {
        self.body.push(element);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn body(&self) -> &Body {
        &self.body
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Attribute(Attribute),
    Block(Block),
}

impl Element {
    pub fn name(&self) -> &str {
        match self {
            Element::Attribute(a) => a.name(),
            Element::Block(b) => b.name(),
        }
    }

    pub fn as_attribute(&self) -> Option<&Attribute> {
        match self {
            Element::Attribute(a) => Some(a),
            Element::Block(_) => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Element::Block(b) => Some(b),
            Element::Attribute(_) => None,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Element::Block(_))
    }
}

impl From<Attribute> for Element {
    fn from(a: Attribute) -> Self {
        Element::Attribute(a)
    }
}

impl From<Block> for Element {
    fn from(b: Block) -> Self {
        Element::Block(b)
    }
}

/// An ordered collection of attributes and blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Body {
    elements: Vec<Element>,
}

impl Body {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: impl Into<Element>) {
        self.elements.push(element.into());
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl From<Vec<Element>> for Body {
    fn from(elements: Vec<Element>) -> Self {
        Self { elements }
    }
}

impl FromIterator<Element> for Body {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self { elements: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a Body {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl IntoIterator for Body {
    type Item = Element;
    type IntoIter = std::vec::IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

/// The root of an OCL file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    body: Body,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child(mut self, element: impl Into<Element>) -> Self {
        self.body.push(element);
        self
    }

    pub fn push(&mut self, element: impl Into<Element>) {
        self.body.push(element);
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn into_body(self) -> Body {
        self.body
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.body.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

impl From<Body> for Document {
    fn from(body: Body) -> Self {
        Self { body }
    }
}

impl From<Vec<Element>> for Document {
    fn from(elements: Vec<Element>) -> Self {
        Self { body: elements.into() }
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.body.iter()
    }
}
