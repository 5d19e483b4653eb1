pub mod ast;
pub mod convert;
pub mod error;
pub mod export;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod serializer;
pub mod writer;

pub use ast::{Attribute, Block, Body, Document, Element, StringFormat, StringLiteral, Value};
pub use convert::{Converter, OclType, TypeDescriptor};
pub use error::OclError;
pub use options::{FormatOptions, SerializerOptions};
pub use parser::parse;
pub use serializer::{deserialize, parse_file, serialize, serialize_value, to_document, OclSerializer};
