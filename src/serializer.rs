// Author: Dustin Pilgrim
// License: MIT

//! Entry points tying the parser, writer and converter chain together.

use std::fs;
use std::path::Path;

use crate::ast::Document;
use crate::convert::{ConversionContext, Convertible, OclType};
use crate::error::OclError;
use crate::options::SerializerOptions;
use crate::{parser, writer};

/// Serializes values to OCL text and back with one set of options.
///
/// # Examples
/// ```
/// use ocl_cfg::convert::{OclType, TypeDescriptor};
/// use ocl_cfg::{OclSerializer, SerializerOptions};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Server {
///     host: String,
///     port: u16,
/// }
///
/// impl OclType for Server {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::object::<Server>()
///             .field("host", |s| &s.host, |s| &mut s.host)
///             .field("port", |s| &s.port, |s| &mut s.port)
///             .build()
///     }
/// }
///
/// # fn main() -> Result<(), ocl_cfg::OclError> {
/// let serializer = OclSerializer::new(SerializerOptions::default());
/// let server = Server { host: "localhost".into(), port: 8080 };
///
/// let text = serializer.serialize_value(&server)?;
/// assert_eq!(text, "host = \"localhost\"\nport = 8080");
///
/// let back: Server = serializer.deserialize_str(&text)?;
/// assert_eq!(back, server);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct OclSerializer {
    options: SerializerOptions,
}

impl OclSerializer {
    pub fn new(options: SerializerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    /// Writes a document as canonical OCL text.
    pub fn serialize(&self, document: &Document) -> Result<String, OclError> {
        writer::write_to_string(document, &self.options.format)
    }

    /// Converts a value to a document, then writes it.
    pub fn serialize_value(&self, value: &dyn Convertible) -> Result<String, OclError> {
        let document = self.to_document(value)?;
        self.serialize(&document)
    }

    pub fn to_document(&self, value: &dyn Convertible) -> Result<Document, OclError> {
        ConversionContext::new(&self.options).to_document(value)
    }

    pub fn deserialize<T: OclType>(&self, document: &Document) -> Result<T, OclError> {
        ConversionContext::new(&self.options).from_document::<T>(document)
    }

    pub fn deserialize_str<T: OclType>(&self, text: &str) -> Result<T, OclError> {
        let document = parser::parse(text)?;
        self.deserialize(&document)
    }

    /// Reads, parses and converts an OCL file.
    pub fn load_file<T: OclType, P: AsRef<Path>>(&self, path: P) -> Result<T, OclError> {
        let document = parse_file(path)?;
        self.deserialize(&document)
    }

    /// Like [`load_file`](Self::load_file), but falls back to a second path
    /// when the first cannot be read. Parse and conversion errors in the
    /// primary file are returned as they are.
    pub fn load_file_with_fallback<T: OclType, P: AsRef<Path>>(&self, primary: P, fallback: P) -> Result<T, OclError> {
        match self.load_file(&primary) {
            Err(OclError::FileError { .. }) => self.load_file(&fallback).map_err(|e| match e {
                OclError::FileError { message, .. } => OclError::FileError {
                    message: format!(
                        "Failed to load from primary path '{}' or fallback path '{}': {}",
                        primary.as_ref().display(),
                        fallback.as_ref().display(),
                        message
                    ),
                    path: format!(
                        "{} (fallback: {})",
                        primary.as_ref().display(),
                        fallback.as_ref().display()
                    ),
                    hint: Some("Check that at least one of the files exists".into()),
                    code: Some(302),
                },
                other => other,
            }),
            result => result,
        }
    }
}

/// Writes a document with the given options.
pub fn serialize(document: &Document, options: &SerializerOptions) -> Result<String, OclError> {
    writer::write_to_string(document, &options.format)
}

pub fn serialize_value(value: &dyn Convertible, options: &SerializerOptions) -> Result<String, OclError> {
    OclSerializer::new(options.clone()).serialize_value(value)
}

pub fn to_document(value: &dyn Convertible, options: &SerializerOptions) -> Result<Document, OclError> {
    ConversionContext::new(options).to_document(value)
}

pub fn deserialize<T: OclType>(document: &Document, options: &SerializerOptions) -> Result<T, OclError> {
    ConversionContext::new(options).from_document::<T>(document)
}

/// Reads and parses an OCL file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document, OclError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| OclError::FileError {
        message: format!("Failed to read file: {}", e),
        path: path.to_string_lossy().to_string(),
        hint: Some("Check that the file exists and is readable".into()),
        code: Some(301),
    })?;

    tracing::debug!(path = %path.display(), "loaded OCL file");
    parser::parse(&content)
}
