// Author: Dustin Pilgrim
// License: MIT

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::convert::{Converter, ConverterRegistry, DefaultNamer, Namer};

/// Text layout settings used by the writer.
///
/// Deserializable so hosts can keep them in their own configuration files;
/// missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub indent_char: char,
    pub indent_depth: usize,
    /// Tag for strings the converters turn into heredocs. Letters, digits
    /// and `_` only; anything else is rejected when written.
    pub default_heredoc_tag: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_char: ' ',
            indent_depth: 4,
            default_heredoc_tag: "EOT".into(),
        }
    }
}

/// Everything the facade needs: layout, user converters and naming.
#[derive(Clone)]
pub struct SerializerOptions {
    pub format: FormatOptions,
    pub converters: ConverterRegistry,
    namer: Arc<dyn Namer>,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            format: FormatOptions::default(),
            converters: ConverterRegistry::new(),
            namer: Arc::new(DefaultNamer),
        }
    }
}

impl SerializerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }

    pub fn indent_char(mut self, c: char) -> Self {
        self.format.indent_char = c;
        self
    }

    pub fn indent_depth(mut self, depth: usize) -> Self {
        self.format.indent_depth = depth;
        self
    }

    pub fn default_heredoc_tag(mut self, tag: impl Into<String>) -> Self {
        self.format.default_heredoc_tag = tag.into();
        self
    }

    /// Registers a user converter. User converters run before the defaults,
    /// in registration order.
    pub fn converter<C: Converter + 'static>(mut self, converter: C) -> Self {
        self.converters.register(converter);
        self
    }

    pub fn namer<N: Namer + 'static>(mut self, namer: N) -> Self {
        self.namer = Arc::new(namer);
        self
    }

    pub fn get_namer(&self) -> &dyn Namer {
        self.namer.as_ref()
    }
}

impl std::fmt::Debug for SerializerOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerializerOptions")
            .field("format", &self.format)
            .field("converters", &self.converters.names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SerializerOptions::default();
        assert_eq!(options.format.indent_char, ' ');
        assert_eq!(options.format.indent_depth, 4);
        assert_eq!(options.format.default_heredoc_tag, "EOT");
        assert!(options.converters.is_empty());
    }

    #[test]
    fn test_format_options_from_partial_json() {
        let format: FormatOptions = serde_json::from_str(r#"{ "indent_depth": 2 }"#).unwrap();
        assert_eq!(format.indent_depth, 2);
        assert_eq!(format.indent_char, ' ');
        assert_eq!(format.default_heredoc_tag, "EOT");

        let format: FormatOptions =
            serde_json::from_str(r#"{ "indent_char": "\t", "default_heredoc_tag": "END" }"#).unwrap();
        assert_eq!(format.indent_char, '\t');
        assert_eq!(format.default_heredoc_tag, "END");
    }

    #[test]
    fn test_builder_methods() {
        let options = SerializerOptions::new().indent_char('\t').indent_depth(1).default_heredoc_tag("DOC");
        assert_eq!(
            options.format,
            FormatOptions {
                indent_char: '\t',
                indent_depth: 1,
                default_heredoc_tag: "DOC".into()
            }
        );
    }
}
