//! Non-interactive UI for pipes and scripts.

use std::collections::HashMap;

use crate::error::Result;

use super::{OutputMode, SelectPrompt, UserInterface};

/// Prefix of environment variables that answer select prompts.
pub const CHOICE_ENV_PREFIX: &str = "ENHANCED_SNIPPETS_CHOICE_";

/// UI implementation for non-interactive mode.
///
/// Select prompts are answered from `ENHANCED_SNIPPETS_CHOICE_<key>`
/// variables, holding either an item label or a zero-based index.
/// Unanswered prompts are dismissed.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides = std::env::vars()
            .filter(|(k, _)| k.starts_with(CHOICE_ENV_PREFIX))
            .collect();
        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn select(&mut self, prompt: &SelectPrompt) -> Result<Option<usize>> {
        let key = format!("{}{}", CHOICE_ENV_PREFIX, prompt.key);
        let Some(answer) = self.env_overrides.get(&key) else {
            return Ok(None);
        };

        let choice = prompt
            .items
            .iter()
            .position(|item| item == answer)
            .or_else(|| answer.parse::<usize>().ok())
            .filter(|i| *i < prompt.items.len());
        if choice.is_none() {
            tracing::warn!("{}={} matches no choice", key, answer);
        }
        Ok(choice)
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt() -> SelectPrompt {
        SelectPrompt {
            key: "1".to_string(),
            question: "Kind".to_string(),
            items: vec!["fn".to_string(), "struct".to_string()],
        }
    }

    fn ui(answer: &str) -> NonInteractiveUI {
        let mut overrides = HashMap::new();
        overrides.insert(format!("{}1", CHOICE_ENV_PREFIX), answer.to_string());
        NonInteractiveUI::with_overrides(OutputMode::Normal, overrides)
    }

    #[test]
    fn select_by_label() {
        assert_eq!(ui("struct").select(&prompt()).unwrap(), Some(1));
    }

    #[test]
    fn select_by_index() {
        assert_eq!(ui("0").select(&prompt()).unwrap(), Some(0));
    }

    #[test]
    fn out_of_range_answer_dismisses() {
        assert_eq!(ui("7").select(&prompt()).unwrap(), None);
    }

    #[test]
    fn missing_answer_dismisses() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Normal, HashMap::new());
        assert_eq!(ui.select(&prompt()).unwrap(), None);
        assert!(!ui.is_interactive());
    }
}
