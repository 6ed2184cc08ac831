//! Terminal user interface.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for pipes and scripts
//! - [`UiPicker`], which lets the field navigator prompt through a UI
//!
//! # Example
//!
//! ```
//! use enhanced_snippets::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.message("Scanning packages");
//! ui.success("Indexed 3 snippets");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use prompts::select_item;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, SnippetTheme};

use crate::error::Result;
use crate::navigator::{ChoiceRequest, Picker};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Ask the user to pick one item. `None` means the prompt was dismissed.
    fn select(&mut self, prompt: &SelectPrompt) -> Result<Option<usize>>;

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// A pick-one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectPrompt {
    /// Key used for scripted answers.
    pub key: String,
    /// The question to display.
    pub question: String,
    /// Display labels, in order.
    pub items: Vec<String>,
}

impl SelectPrompt {
    /// The prompt for a field choice: keyed by field id, labelled with the
    /// choice text and its details when present.
    pub fn for_choice(request: &ChoiceRequest) -> Self {
        Self {
            key: request.field.clone(),
            question: request.placeholder.clone(),
            items: request
                .choices
                .iter()
                .map(|c| match &c.details {
                    Some(details) => format!("{} ({})", c.text, details),
                    None => c.text.clone(),
                })
                .collect(),
        }
    }
}

/// Adapts a [`UserInterface`] to the navigator's [`Picker`].
///
/// A prompt that fails is reported as a warning and treated as dismissed.
pub struct UiPicker<'a> {
    ui: &'a mut dyn UserInterface,
}

impl<'a> UiPicker<'a> {
    pub fn new(ui: &'a mut dyn UserInterface) -> Self {
        Self { ui }
    }
}

impl Picker for UiPicker<'_> {
    fn pick(&mut self, request: &ChoiceRequest) -> Option<usize> {
        match self.ui.select(&SelectPrompt::for_choice(request)) {
            Ok(choice) => choice,
            Err(e) => {
                self.ui
                    .warning(&format!("Choice for field {} failed: {}", request.field, e));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snippet::Choice;

    fn request() -> ChoiceRequest {
        ChoiceRequest {
            field: "2".to_string(),
            placeholder: "Kind".to_string(),
            choices: vec![
                Choice::text("fn"),
                Choice {
                    text: "struct".to_string(),
                    details: Some("a type".to_string()),
                },
            ],
        }
    }

    #[test]
    fn select_prompt_labels_include_details() {
        let prompt = SelectPrompt::for_choice(&request());
        assert_eq!(prompt.key, "2");
        assert_eq!(prompt.question, "Kind");
        assert_eq!(prompt.items, vec!["fn", "struct (a type)"]);
    }

    #[test]
    fn ui_picker_forwards_to_select() {
        let mut ui = MockUI::new();
        ui.queue_selection("2", Some(1));
        let mut picker = UiPicker::new(&mut ui);
        assert_eq!(picker.pick(&request()), Some(1));
        assert_eq!(ui.prompts_shown(), &["2".to_string()]);
    }

    #[test]
    fn ui_picker_unanswered_is_dismissed() {
        let mut ui = MockUI::new();
        let mut picker = UiPicker::new(&mut ui);
        assert_eq!(picker.pick(&request()), None);
    }
}
