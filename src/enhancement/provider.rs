//! The provider interface.
//!
//! A provider owns one custom variable. It can tell whether a snippet body
//! references that variable and, given the body, produce bindings plus a
//! possibly rewritten body.

use regex::Regex;
use std::collections::BTreeMap;

/// Bindings and rewritten body produced by one provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    pub bindings: BTreeMap<String, String>,
    pub content: String,
}

impl Expansion {
    /// No bindings, body unchanged.
    pub fn unchanged(content: &str) -> Self {
        Self {
            bindings: BTreeMap::new(),
            content: content.to_string(),
        }
    }

    /// A single binding, body unchanged.
    pub fn single(content: &str, name: &str, value: impl Into<String>) -> Self {
        let mut bindings = BTreeMap::new();
        bindings.insert(name.to_string(), value.into());
        Self {
            bindings,
            content: content.to_string(),
        }
    }
}

/// A component that expands one custom snippet variable.
pub trait EnhancementProvider {
    /// The variable this provider is responsible for.
    fn variable_name(&self) -> &str;

    /// Short type identity, used as the last segment of the provider's origin.
    fn type_name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Whether `content` references this provider's variable.
    fn is_applicable(&self, content: &str) -> bool {
        variable_pattern(self.variable_name()).is_match(content)
    }

    /// Produce bindings for `content` and the body to use afterwards.
    fn expand(&self, content: &str) -> Expansion;
}

/// Pattern for `${NAME}` / `${NAME:default}` with the default (including
/// its leading colon) in capture group 1.
pub fn variable_pattern(name: &str) -> Regex {
    let pattern = format!(r"\$\{{{}(:[^}}]*)?\}}", regex::escape(name));
    Regex::new(&pattern).expect("escaped variable name always forms a valid pattern")
}
