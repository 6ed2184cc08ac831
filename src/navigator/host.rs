//! What the navigator needs from the host editor.

use serde::Serialize;

use crate::snippet::{Choice, FieldOptionSet};

/// A request to let the user choose one value for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceRequest {
    pub field: String,
    pub placeholder: String,
    pub choices: Vec<Choice>,
}

impl ChoiceRequest {
    pub fn for_field(field: &str, options: &FieldOptionSet) -> Self {
        Self {
            field: field.to_string(),
            placeholder: options.placeholder().to_string(),
            choices: options.choices().to_vec(),
        }
    }
}

/// Host quick-pick dialog.
pub trait Picker {
    /// Show the choices and return the chosen index, or `None` when the
    /// user dismissed the prompt.
    fn pick(&mut self, request: &ChoiceRequest) -> Option<usize>;
}

/// Host text insertion with per-field tracking marks.
pub trait TextInserter {
    /// Insert `text` at the current selection and mark the inserted spans
    /// as belonging to `field`.
    fn insert_and_mark(&mut self, field: &str, text: &str);

    /// Select the spans previously marked for `field`, if any.
    fn select_marked(&mut self, field: &str) -> bool;

    /// Forget the marks for `field`.
    fn erase_marks(&mut self, field: &str);

    /// Advance the host's own snippet field cursor.
    fn next_field(&mut self);
}
