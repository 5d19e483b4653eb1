// Author: Dustin Pilgrim
// License: MIT

use once_cell::sync::Lazy;
use regex::Regex;

/// Turns a field name into an element name.
pub trait Namer: Send + Sync {
    fn format_name(&self, name: &str) -> String;
}

static ACRONYM_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("valid acronym pattern"));

static WORD_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid word boundary pattern"));

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid separator pattern"));

/// snake_case: `MyProp` -> `my_prop`, `HTTPServer` -> `http_server`,
/// `The Name` -> `the_name`. Names that are already snake_case pass through.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNamer;

impl Namer for DefaultNamer {
    fn format_name(&self, name: &str) -> String {
        let name = ACRONYM_BOUNDARY.replace_all(name.trim(), "${1}_${2}");
        let name = WORD_BOUNDARY.replace_all(&name, "${1}_${2}");
        SEPARATORS.replace_all(&name, "_").to_lowercase()
    }
}

/// Leaves names exactly as declared.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimNamer;

impl Namer for VerbatimNamer {
    fn format_name(&self, name: &str) -> String {
        name.to_string()
    }
}
