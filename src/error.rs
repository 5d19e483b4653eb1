// Author: Dustin Pilgrim
// License: MIT

use std::fmt;

/// The main error type for OCL parsing, writing and conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum OclError {
    /// Malformed input text. `line` and `column` point at the furthest
    /// position the parser reached.
    ParseError {
        message: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised by the writer for a value it has no textual form for.
    UnsupportedValueType {
        type_name: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// No converter in the chain claims the type.
    ConverterNotFound {
        type_name: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Structural mismatch while converting between typed values and elements.
    ConversionError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// A blank attribute or block name reached the writer.
    InvalidIdentifier {
        identifier: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    FileError {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
}

impl OclError {
    pub(crate) fn parse(message: impl Into<String>, line: usize, column: usize, hint: Option<&str>, code: u32) -> Self {
        OclError::ParseError {
            message: message.into(),
            line,
            column,
            hint: hint.map(Into::into),
            code: Some(code),
        }
    }

    pub(crate) fn conversion(message: impl Into<String>, hint: Option<&str>, code: u32) -> Self {
        OclError::ConversionError {
            message: message.into(),
            hint: hint.map(Into::into),
            code: Some(code),
        }
    }

    pub(crate) fn unsupported(type_name: impl Into<String>, hint: Option<&str>) -> Self {
        OclError::UnsupportedValueType {
            type_name: type_name.into(),
            hint: hint.map(Into::into),
            code: Some(501),
        }
    }

    /// Numeric error code, if one was attached.
    pub fn code(&self) -> Option<u32> {
        match self {
            OclError::ParseError { code, .. }
            | OclError::UnsupportedValueType { code, .. }
            | OclError::ConverterNotFound { code, .. }
            | OclError::ConversionError { code, .. }
            | OclError::InvalidIdentifier { code, .. }
            | OclError::FileError { code, .. } => *code,
        }
    }

    /// `(line, column)` for parse errors.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            OclError::ParseError { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}

fn suffix(hint: &Option<String>, code: &Option<u32>) -> String {
    format!(
        "{}{}",
        hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
        code.map_or(String::new(), |c| format!(" Code: {}", c))
    )
}

impl fmt::Display for OclError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OclError::ParseError { message, line, column, hint, code } =>
                write!(f, "[OCL] Parse Error at {}:{}: {}{}",
                    line, column, message, suffix(hint, code)
                ),
            OclError::UnsupportedValueType { type_name, hint, code } =>
                write!(f, "[OCL] Unsupported value type '{}'{}",
                    type_name, suffix(hint, code)
                ),
            OclError::ConverterNotFound { type_name, hint, code } =>
                write!(f, "[OCL] Could not find a converter for '{}'{}",
                    type_name, suffix(hint, code)
                ),
            OclError::ConversionError { message, hint, code } =>
                write!(f, "[OCL] Conversion Error: {}{}",
                    message, suffix(hint, code)
                ),
            OclError::InvalidIdentifier { identifier, hint, code } =>
                write!(f, "[OCL] Invalid identifier '{}'{}",
                    identifier, suffix(hint, code)
                ),
            OclError::FileError { message, path, hint, code } =>
                write!(f, "[OCL] File Error '{}': {}{}",
                    path, message, suffix(hint, code)
                ),
        }
    }
}

impl std::error::Error for OclError {}
