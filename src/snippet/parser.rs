//! Format detection and snippet construction.
//!
//! Formats are tried in a fixed order: markup first, then the metadata
//! block. The two are distinguishable by their first non-blank text (a
//! `<snippet>` root tag versus a `---` delimiter line), so at most one of
//! them ever claims a resource.

use super::frontmatter::parse_frontmatter;
use super::markup::parse_markup;
use super::Snippet;
use crate::error::{Result, SnippetError};

/// The textual format a snippet was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetFormat {
    Markup,
    MetadataBlock,
}

/// Parse raw resource bytes into a [`Snippet`].
///
/// # Errors
///
/// Returns `Format` when neither format recognizes the text and
/// `Validation` when a recognized format is missing required fields.
pub fn parse(raw: &[u8], resource: &str) -> Result<Snippet> {
    parse_with_format(raw, resource).map(|(snippet, _)| snippet)
}

/// Parse raw bytes, also reporting which format matched.
pub fn parse_with_format(raw: &[u8], resource: &str) -> Result<(Snippet, SnippetFormat)> {
    let text = std::str::from_utf8(raw).map_err(|_| SnippetError::Format {
        resource: resource.to_string(),
    })?;
    let text = normalize(text);

    if let Some(parts) = parse_markup(&text, resource)? {
        return Ok((Snippet::from_parts(parts, resource), SnippetFormat::Markup));
    }

    if let Some(parts) = parse_frontmatter(&text, resource)? {
        return Ok((
            Snippet::from_parts(parts, resource),
            SnippetFormat::MetadataBlock,
        ));
    }

    Err(SnippetError::Format {
        resource: resource.to_string(),
    })
}

/// Strip a byte-order mark and normalize line endings.
fn normalize(text: &str) -> String {
    text.trim_start_matches('\u{feff}').replace("\r\n", "\n")
}
