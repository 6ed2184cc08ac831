//! Markup snippet format.
//!
//! ```xml
//! <snippet>
//!     <tabTrigger>hdr</tabTrigger>
//!     <description>File header</description>
//!     <scope>source.python</scope>
//!     <glob>*.py</glob>
//!     <content><![CDATA[# ${1:title} (${DATE})]]></content>
//!     <options>
//!         <field>
//!             <number>1</number>
//!             <placeholder>Pick a title</placeholder>
//!             <values>
//!                 <value>Module</value>
//!                 <value details="For test files">Tests</value>
//!             </values>
//!         </field>
//!     </options>
//! </snippet>
//! ```
//!
//! Missing top-level tags default to empty strings. A `field` block missing
//! its number, placeholder or values is a validation error.

use roxmltree::{Document, Node};
use std::collections::BTreeMap;

use super::{Choice, FieldOptionSet, SnippetParts};
use crate::error::{Result, SnippetError};

const ROOT_TAG: &str = "snippet";

/// Parse markup-format text.
///
/// Returns `Ok(None)` when the text is not a `<snippet>` document so the
/// caller can try the next format.
pub fn parse_markup(text: &str, resource: &str) -> Result<Option<SnippetParts>> {
    if !text.trim_start().starts_with('<') {
        return Ok(None);
    }

    let doc = match Document::parse(text) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::debug!("{} is not well-formed markup: {}", resource, e);
            return Ok(None);
        }
    };

    let root = doc.root_element();
    if !root.has_tag_name(ROOT_TAG) {
        return Ok(None);
    }

    let options = match child(root, "options") {
        Some(node) => parse_options(node, resource)?,
        None => BTreeMap::new(),
    };

    Ok(Some(SnippetParts {
        trigger: child_text(root, "tabTrigger"),
        description: child_text(root, "description"),
        content: child_text(root, "content").trim_start().to_string(),
        scope: child_text(root, "scope"),
        glob: child_text(root, "glob"),
        options,
    }))
}

fn parse_options(node: Node<'_, '_>, resource: &str) -> Result<BTreeMap<String, FieldOptionSet>> {
    let mut options = BTreeMap::new();

    for (idx, field) in elements(node).filter(|n| n.has_tag_name("field")).enumerate() {
        let number = child(field, "number")
            .map(text_of)
            .ok_or_else(|| missing(resource, idx, "number"))?;
        let number: u32 = number.trim().parse().map_err(|_| {
            SnippetError::validation(
                resource,
                format!(
                    "options field {}: <number> must be an integer, got '{}'",
                    idx,
                    number.trim()
                ),
            )
        })?;

        let placeholder = child(field, "placeholder")
            .map(text_of)
            .ok_or_else(|| missing(resource, idx, "placeholder"))?;

        let values = child(field, "values").ok_or_else(|| missing(resource, idx, "values"))?;
        let choices: Vec<Choice> = elements(values)
            .map(|v| Choice {
                text: text_of(v),
                details: v.attribute("details").map(str::to_string),
            })
            .collect();

        let set = FieldOptionSet::new(placeholder, choices).ok_or_else(|| {
            SnippetError::validation(
                resource,
                format!("options field {}: <values> must contain at least one value", idx),
            )
        })?;
        options.insert(number.to_string(), set);
    }

    Ok(options)
}

fn missing(resource: &str, idx: usize, tag: &str) -> SnippetError {
    SnippetError::validation(resource, format!("options field {}: missing <{}>", idx, tag))
}

fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    elements(node).find(|n| n.has_tag_name(tag))
}

/// All direct text of a node; CDATA sections arrive as text nodes.
fn text_of(node: Node<'_, '_>) -> String {
    node.children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

fn child_text(node: Node<'_, '_>, tag: &str) -> String {
    child(node, tag).map(text_of).unwrap_or_default()
}
