//! Data model for named-parameter Go.
//!
//! Everything here is transient: values are built and dropped within a
//! single rewrite of one source file.
//!
//! - [`Parameter`] / [`ParameterList`]: ordered `name: detail` pairs
//! - [`Signature`]: a base name plus its parameter list
//! - [`mangle`]: the positional identifier a signature rewrites to
//! - [`DepthTag`]: textual markers standing in for structural parentheses
//! - [`NpSyntax`]: which rewrites are active

use serde::{Deserialize, Serialize};

/// One `name: detail` entry.
///
/// `detail` is the type text in a definition and the argument expression at
/// a call site, already trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub detail: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: detail.into(),
        }
    }
}

/// Ordered parameters as written. An empty list means the construct is not a
/// named-parameter construct and must be left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterList(Vec<Parameter>);

impl ParameterList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, param: Parameter) {
        self.0.push(param);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.0.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|p| p.name.as_str())
    }
}

impl From<Vec<Parameter>> for ParameterList {
    fn from(params: Vec<Parameter>) -> Self {
        Self(params)
    }
}

impl FromIterator<Parameter> for ParameterList {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ParameterList {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A named-parameter definition or call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub base_name: String,
    pub params: ParameterList,
    /// 1-based line of the base name in the input.
    pub line: usize,
}

impl Signature {
    pub fn mangled_name(&self) -> String {
        mangle(&self.base_name, self.params.names())
    }
}

/// Build the positional identifier: `base` followed by `_name` for each
/// parameter name, in order.
///
/// Only the names take part, so a definition and every call naming the same
/// parameters in the same order agree on the result.
pub fn mangle<'a>(base: &str, names: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = base.to_string();
    for name in names {
        out.push('_');
        out.push_str(name);
    }
    out
}

/// Textual stand-in for a structural parenthesis at a given nesting depth.
///
/// Tags are delimited with private-use code points (the lexer escapes any
/// that already occur in the source), and opening and closing tags differ so
/// a flat pattern whose interior excludes both can only match an innermost
/// span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthTag {
    Open(usize),
    Close(usize),
}

impl DepthTag {
    pub const OPEN: char = '\u{E000}';
    pub const CLOSE: char = '\u{E001}';
    pub const END: char = '\u{E002}';

    pub fn is_reserved(c: char) -> bool {
        matches!(c, Self::OPEN | Self::CLOSE | Self::END)
    }

    pub fn depth(self) -> usize {
        match self {
            DepthTag::Open(d) | DepthTag::Close(d) => d,
        }
    }
}

impl std::fmt::Display for DepthTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DepthTag::Open(d) => write!(f, "{}{}{}", Self::OPEN, d, Self::END),
            DepthTag::Close(d) => write!(f, "{}{}{}", Self::CLOSE, d, Self::END),
        }
    }
}

/// Directive prefixes neutralized by default.
pub const DEFAULT_DIRECTIVE_PREFIXES: [&str; 2] = ["//go:generate", "// +build"];

/// Feature flags controlling which rewrites are active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpSyntax {
    pub directives: bool,
    pub definitions: bool,
    pub invocations: bool,
    /// Lines starting with one of these are replaced by `//`.
    pub directive_prefixes: Vec<String>,
}

impl Default for NpSyntax {
    fn default() -> Self {
        Self {
            directives: true,
            definitions: true,
            invocations: true,
            directive_prefixes: DEFAULT_DIRECTIVE_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mangle_appends_names_in_order() {
        assert_eq!(mangle("named", ["a", "b"]), "named_a_b");
        assert_eq!(mangle("f", std::iter::empty()), "f");
    }

    #[test]
    fn mangled_name_ignores_details() {
        let def = Signature {
            base_name: "named".into(),
            params: vec![Parameter::new("a", "int"), Parameter::new("b", "int")].into(),
            line: 1,
        };
        let call = Signature {
            base_name: "named".into(),
            params: vec![Parameter::new("a", "3"), Parameter::new("b", "x + 1")].into(),
            line: 9,
        };
        assert_eq!(def.mangled_name(), call.mangled_name());
    }

    #[test]
    fn depth_tags_are_distinct_per_direction() {
        assert_ne!(DepthTag::Open(1).to_string(), DepthTag::Close(1).to_string());
        assert_eq!(DepthTag::Open(3).depth(), 3);
        assert!(DepthTag::Close(0)
            .to_string()
            .chars()
            .all(|c| DepthTag::is_reserved(c) || c.is_ascii_digit()));
    }

    #[test]
    fn syntax_config_fills_missing_fields_with_defaults() {
        let syntax: NpSyntax = serde_json::from_str(r#"{"directives": false}"#).unwrap();
        assert!(!syntax.directives);
        assert!(syntax.invocations);
        assert_eq!(syntax.directive_prefixes, vec!["//go:generate", "// +build"]);
    }
}
