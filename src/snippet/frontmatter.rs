//! Metadata-block snippet format.
//!
//! ```text
//! ---
//! tabTrigger: hello
//! description: insert sample text
//! scope: source.python
//! glob: test_*.py
//! options:
//!   - field: 2
//!     placeholder: possible values for field 2
//!     values:
//!       - an enhanced snippet
//!       - text: a second optional value
//!         details: the second value in the list
//! ---
//! Hello, ${1:this} is ${2:placeholder}.
//! ```
//!
//! The header is YAML between two `---` lines. Everything after the closing
//! delimiter is the body, left-stripped of leading whitespace.

use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

use super::{Choice, FieldOptionSet, SnippetParts};
use crate::error::{Result, SnippetError};

const DELIMITER: &str = "---";
const VALUES_TYPE: &str = "a list of strings or {text, details} mappings";

/// Parse metadata-block text.
///
/// Returns `Ok(None)` when the text does not open with a delimiter line or
/// the block is never closed.
pub fn parse_frontmatter(text: &str, resource: &str) -> Result<Option<SnippetParts>> {
    let Some((header, body)) = split_block(text) else {
        return Ok(None);
    };

    let meta: Value = if header.trim().is_empty() {
        Value::Mapping(Mapping::new())
    } else {
        serde_yaml::from_str(header).map_err(|e| {
            SnippetError::validation(resource, format!("metadata block is not valid YAML: {}", e))
        })?
    };

    let meta = match meta {
        Value::Mapping(map) => map,
        Value::Null => Mapping::new(),
        _ => {
            return Err(SnippetError::validation(
                resource,
                "metadata block must be a mapping of keys to values",
            ))
        }
    };

    let options = match meta.get("options") {
        None | Some(Value::Null) => BTreeMap::new(),
        Some(value) => parse_options(value, resource)?,
    };

    Ok(Some(SnippetParts {
        trigger: string_key(&meta, "tabTrigger", resource)?,
        description: string_key(&meta, "description", resource)?,
        content: body.trim_start().to_string(),
        scope: string_key(&meta, "scope", resource)?,
        glob: string_key(&meta, "glob", resource)?,
        options,
    }))
}

/// Split into (header, body) at the opening and closing delimiter lines.
fn split_block(text: &str) -> Option<(&str, &str)> {
    let mut lines = text.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != DELIMITER {
        return None;
    }

    let header_start = first.len();
    let mut offset = header_start;
    for line in lines {
        if line.trim_end() == DELIMITER {
            return Some((&text[header_start..offset], &text[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

fn string_key(meta: &Mapping, key: &str, resource: &str) -> Result<String> {
    match meta.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err(SnippetError::validation(
            resource,
            format!("'{}' must be a string", key),
        )),
    }
}

fn parse_options(value: &Value, resource: &str) -> Result<BTreeMap<String, FieldOptionSet>> {
    let Value::Sequence(entries) = value else {
        return Err(SnippetError::validation(
            resource,
            "'options' must be a list of {field, placeholder, values} mappings",
        ));
    };

    let mut options = BTreeMap::new();
    for (idx, entry) in entries.iter().enumerate() {
        let Value::Mapping(entry) = entry else {
            return Err(SnippetError::validation(
                resource,
                format!("options[{}] must be a mapping", idx),
            ));
        };

        let field = match entry.get("field") {
            None | Some(Value::Null) => return Err(missing(resource, idx, "field", "an integer")),
            Some(v) => v
                .as_u64()
                .ok_or_else(|| wrong_type(resource, idx, "field", "an integer"))?,
        };

        let placeholder = match entry.get("placeholder") {
            None | Some(Value::Null) => {
                return Err(missing(resource, idx, "placeholder", "a string"))
            }
            Some(Value::String(s)) => s.clone(),
            Some(_) => return Err(wrong_type(resource, idx, "placeholder", "a string")),
        };

        let values = match entry.get("values") {
            None | Some(Value::Null) => return Err(missing(resource, idx, "values", VALUES_TYPE)),
            Some(Value::Sequence(values)) => values,
            Some(_) => return Err(wrong_type(resource, idx, "values", VALUES_TYPE)),
        };

        let choices = values
            .iter()
            .map(|v| parse_choice(v, resource, idx))
            .collect::<Result<Vec<_>>>()?;

        let set = FieldOptionSet::new(placeholder, choices).ok_or_else(|| {
            SnippetError::validation(
                resource,
                format!("options[{}].values must contain at least one value", idx),
            )
        })?;
        options.insert(field.to_string(), set);
    }

    Ok(options)
}

fn parse_choice(value: &Value, resource: &str, idx: usize) -> Result<Choice> {
    match value {
        Value::String(s) => Ok(Choice::text(s.clone())),
        Value::Mapping(map) => {
            let text = match map.get("text") {
                Some(Value::String(s)) => s.clone(),
                _ => return Err(missing(resource, idx, "values[].text", "a string")),
            };
            let details = match map.get("details") {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => Some(s.clone()),
                Some(_) => return Err(wrong_type(resource, idx, "values[].details", "a string")),
            };
            Ok(Choice { text, details })
        }
        _ => Err(wrong_type(resource, idx, "values", VALUES_TYPE)),
    }
}

fn missing(resource: &str, idx: usize, key: &str, expected: &str) -> SnippetError {
    SnippetError::validation(
        resource,
        format!("options[{}]: missing '{}' (expected {})", idx, key, expected),
    )
}

fn wrong_type(resource: &str, idx: usize, key: &str, expected: &str) -> SnippetError {
    SnippetError::validation(
        resource,
        format!("options[{}]: '{}' must be {}", idx, key, expected),
    )
}
