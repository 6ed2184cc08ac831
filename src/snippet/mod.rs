//! Snippet records and the parsers that produce them.
//!
//! A [`Snippet`] is an immutable value built once from raw resource bytes
//! by [`parse`]. Two textual formats are supported:
//!
//! - markup: a `<snippet>` root element with child elements (see [`markup`])
//! - metadata block: a `---` delimited YAML header followed by the body
//!   (see [`frontmatter`])
//!
//! # Example
//!
//! ```
//! use enhanced_snippets::snippet::parse;
//!
//! let raw = "---\ntabTrigger: hi\n---\nHello ${1:name}, today is ${DATE}";
//! let snippet = parse(raw.as_bytes(), "Packages/User/hi.enhanced-sublime-snippet").unwrap();
//!
//! assert_eq!(snippet.package(), "User");
//! assert_eq!(snippet.fields(), ["1", "0"]);
//! assert!(snippet.variables().contains("DATE"));
//! ```

pub mod frontmatter;
pub mod markup;
pub mod parser;
pub mod scanner;

pub use parser::{parse, parse_with_format, SnippetFormat};
pub use scanner::{scan, VariableScan};

use indexmap::IndexSet;
use serde::Serialize;
use std::collections::BTreeMap;

/// The id of the field that marks the final cursor position.
pub const EXIT_FIELD: &str = "0";

/// One selectable value for a multi-choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub text: String,
    pub details: Option<String>,
}

impl Choice {
    /// A choice with no details line.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            details: None,
        }
    }
}

/// Multi-choice metadata attached to one numeric field.
///
/// Never empty; construction refuses an empty choice list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldOptionSet {
    placeholder: String,
    choices: Vec<Choice>,
}

impl FieldOptionSet {
    /// Build an option set, or `None` when `choices` is empty.
    pub fn new(placeholder: impl Into<String>, choices: Vec<Choice>) -> Option<Self> {
        if choices.is_empty() {
            return None;
        }
        Some(Self {
            placeholder: placeholder.into(),
            choices,
        })
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }
}

/// Format-independent fields extracted by one of the format parsers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnippetParts {
    pub trigger: String,
    pub description: String,
    pub content: String,
    pub scope: String,
    pub glob: String,
    pub options: BTreeMap<String, FieldOptionSet>,
}

/// A parsed snippet definition.
///
/// `resource` is the primary key; `package` is derived from it and
/// `variables`/`fields` from `content`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snippet {
    trigger: String,
    description: String,
    content: String,
    variables: IndexSet<String>,
    fields: Vec<String>,
    options: BTreeMap<String, FieldOptionSet>,
    scope: String,
    glob: String,
    resource: String,
    package: String,
}

impl Snippet {
    /// Finish a snippet from parsed parts, scanning its body.
    pub fn from_parts(parts: SnippetParts, resource: &str) -> Self {
        let VariableScan { variables, fields } = scan(&parts.content);

        Self {
            trigger: parts.trigger,
            description: parts.description,
            content: parts.content,
            variables,
            fields,
            options: parts.options,
            scope: parts.scope,
            glob: parts.glob,
            resource: resource.to_string(),
            package: package_of(resource).to_string(),
        }
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Named variables in first-appearance order.
    pub fn variables(&self) -> &IndexSet<String> {
        &self.variables
    }

    /// Numeric fields in expansion order; always ends with `"0"`.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn options(&self) -> &BTreeMap<String, FieldOptionSet> {
        &self.options
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn glob(&self) -> &str {
        &self.glob
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// True when the body has numeric fields beyond the implicit exit field
    /// or carries option metadata.
    pub fn has_fields(&self) -> bool {
        self.fields.len() > 1 || !self.options.is_empty()
    }

    /// Display title for listings: the description, else the file name.
    pub fn title(&self) -> &str {
        if !self.description.is_empty() {
            return &self.description;
        }
        let base = self.resource.rsplit('/').next().unwrap_or(&self.resource);
        base.split('.').next().filter(|s| !s.is_empty()).unwrap_or(base)
    }
}

/// The package that owns a resource: its second path segment.
///
/// `Packages/User/foo.sublime-snippet` belongs to `User`.
pub fn package_of(resource: &str) -> &str {
    resource.split('/').nth(1).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(content: &str) -> SnippetParts {
        SnippetParts {
            content: content.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn package_is_second_segment() {
        assert_eq!(package_of("Packages/User/a.sublime-snippet"), "User");
        assert_eq!(package_of("Packages/Foo/sub/b.sublime-snippet"), "Foo");
        assert_eq!(package_of("inline"), "");
    }

    #[test]
    fn from_parts_scans_body() {
        let snippet = Snippet::from_parts(
            parts("${2:b} ${CLIPBOARD} ${1:a}"),
            "Packages/User/t.sublime-snippet",
        );
        assert_eq!(snippet.fields(), ["1", "2", "0"]);
        assert_eq!(
            snippet.variables().iter().collect::<Vec<_>>(),
            vec!["CLIPBOARD"]
        );
        assert_eq!(snippet.package(), "User");
    }

    #[test]
    fn title_prefers_description() {
        let mut p = parts("x");
        p.description = "Insert header".into();
        let snippet = Snippet::from_parts(p, "Packages/User/header.sublime-snippet");
        assert_eq!(snippet.title(), "Insert header");
    }

    #[test]
    fn title_falls_back_to_base_name() {
        let snippet = Snippet::from_parts(parts("x"), "Packages/User/header.sublime-snippet");
        assert_eq!(snippet.title(), "header");
    }

    #[test]
    fn option_set_refuses_empty_choices() {
        assert!(FieldOptionSet::new("pick", vec![]).is_none());
        let set = FieldOptionSet::new("pick", vec![Choice::text("a")]).unwrap();
        assert_eq!(set.placeholder(), "pick");
        assert_eq!(set.choices().len(), 1);
    }

    #[test]
    fn has_fields_ignores_lone_exit_field() {
        let plain = Snippet::from_parts(parts("${DATE}"), "Packages/U/a.sublime-snippet");
        assert!(!plain.has_fields());
        let numbered = Snippet::from_parts(parts("${1:x}"), "Packages/U/b.sublime-snippet");
        assert!(numbered.has_fields());
    }
}
