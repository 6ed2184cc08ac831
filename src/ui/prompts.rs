//! Interactive prompts.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;

use crate::error::{Result, SnippetError};

use super::SelectPrompt;

/// Convert dialoguer errors to SnippetError.
fn map_dialoguer_err(e: dialoguer::Error) -> SnippetError {
    SnippetError::Io(e.into())
}

/// Dialoguer theme without the default yellow `?` prefix.
fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("".to_string()),
        ..ColorfulTheme::default()
    }
}

/// Show a select list on `term`. Escape dismisses it.
pub fn select_item(prompt: &SelectPrompt, term: &Term) -> Result<Option<usize>> {
    if prompt.items.is_empty() {
        return Ok(None);
    }
    Select::with_theme(&prompt_theme())
        .with_prompt(&prompt.question)
        .items(&prompt.items)
        .default(0)
        .interact_on_opt(term)
        .map_err(map_dialoguer_err)
}
