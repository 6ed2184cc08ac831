//! Field navigation for an in-progress snippet expansion.
//!
//! A [`FieldNavigator`] belongs to one document. It is `Idle` until an
//! expansion with fields begins, then tracks which field is current. Moving
//! onto a field that carries options prompts the host [`Picker`]; a chosen
//! value is inserted and marked through the [`TextInserter`] and, unless it
//! was the exit field, the navigator advances to the next field.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use enhanced_snippets::navigator::{FieldNavigator, RecordingInserter, ScriptedPicker};
//! use enhanced_snippets::snippet::{Choice, FieldOptionSet};
//!
//! let mut options = BTreeMap::new();
//! options.insert("2".to_string(), FieldOptionSet::new("Kind", vec![Choice::text("fn")]).unwrap());
//!
//! let mut nav = FieldNavigator::new();
//! let mut inserter = RecordingInserter::new();
//! nav.begin(vec!["1".into(), "2".into(), "0".into()], options, &mut inserter);
//!
//! let mut picker = ScriptedPicker::new([Some(0)]);
//! assert!(nav.move_by(1, &mut picker, &mut inserter).unwrap());
//! assert_eq!(nav.current_field(), Some("0"));
//! assert_eq!(inserter.marks()["2"], "fn");
//! ```

mod host;
mod mock;

pub use host::{ChoiceRequest, Picker, TextInserter};
pub use mock::{InsertEvent, RecordingInserter, ScriptedPicker};

use std::collections::BTreeMap;

use crate::error::{Result, SnippetError};
use crate::snippet::{FieldOptionSet, Snippet, EXIT_FIELD};

/// Tracking data for an active expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFields {
    fields: Vec<String>,
    options: BTreeMap<String, FieldOptionSet>,
    current: usize,
}

impl ActiveFields {
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn options(&self) -> &BTreeMap<String, FieldOptionSet> {
        &self.options
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_field(&self) -> &str {
        &self.fields[self.current]
    }
}

/// Navigator state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NavState {
    #[default]
    Idle,
    Active(ActiveFields),
}

/// Per-document field navigation state machine.
#[derive(Debug, Clone, Default)]
pub struct FieldNavigator {
    state: NavState,
}

impl FieldNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, NavState::Active(_))
    }

    /// The current field id, when active.
    pub fn current_field(&self) -> Option<&str> {
        match &self.state {
            NavState::Active(active) => Some(active.current_field()),
            NavState::Idle => None,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        match &self.state {
            NavState::Active(active) => Some(active.current),
            NavState::Idle => None,
        }
    }

    /// Number of tracked fields; zero when idle.
    pub fn field_count(&self) -> usize {
        match &self.state {
            NavState::Active(active) => active.fields.len(),
            NavState::Idle => 0,
        }
    }

    /// Start tracking a new expansion at its first field.
    ///
    /// Any previous expansion is cleared first. An empty field list leaves
    /// the navigator idle.
    pub fn begin(
        &mut self,
        fields: Vec<String>,
        options: BTreeMap<String, FieldOptionSet>,
        inserter: &mut dyn TextInserter,
    ) {
        self.clear(inserter);
        if fields.is_empty() {
            return;
        }
        tracing::debug!("Tracking {} snippet fields", fields.len());
        self.state = NavState::Active(ActiveFields {
            fields,
            options,
            current: 0,
        });
    }

    /// Start tracking the fields of `snippet`.
    pub fn begin_snippet(&mut self, snippet: &Snippet, inserter: &mut dyn TextInserter) {
        self.begin(snippet.fields().to_vec(), snippet.options().clone(), inserter);
    }

    /// Stop tracking, erasing every field's marks.
    pub fn clear(&mut self, inserter: &mut dyn TextInserter) {
        if let NavState::Active(active) = std::mem::take(&mut self.state) {
            for field in &active.fields {
                inserter.erase_marks(field);
            }
        }
    }

    /// Move by `step` fields (-1, 0 or +1) and prompt when the new current
    /// field has options.
    ///
    /// Returns whether a choice was applied. Idle navigators ignore moves.
    ///
    /// # Errors
    ///
    /// `FieldMove` when the move would leave the field list; the state is
    /// left as it was.
    pub fn move_by(
        &mut self,
        step: isize,
        picker: &mut dyn Picker,
        inserter: &mut dyn TextInserter,
    ) -> Result<bool> {
        let request = {
            let NavState::Active(active) = &mut self.state else {
                return Ok(false);
            };
            let len = active.fields.len();
            let index = active.current as isize + step;
            if index < 0 || index as usize >= len {
                return Err(SnippetError::FieldMove { index, len });
            }
            active.current = index as usize;

            let field = active.current_field();
            active
                .options
                .get(field)
                .map(|options| ChoiceRequest::for_field(field, options))
        };

        match request {
            Some(request) => self.prompt(&request, picker, inserter),
            None => Ok(false),
        }
    }

    /// Prompt for the options of the current field, if it has any.
    pub fn pick_current(
        &mut self,
        picker: &mut dyn Picker,
        inserter: &mut dyn TextInserter,
    ) -> Result<bool> {
        self.move_by(0, picker, inserter)
    }

    /// Show `request` and apply the chosen value.
    ///
    /// Existing marks for the field are selected first so a choice replaces
    /// the previous one. A cancelled prompt changes nothing. Choosing a
    /// value for the current field advances to the next one, unless the
    /// current field is the exit field.
    pub fn prompt(
        &mut self,
        request: &ChoiceRequest,
        picker: &mut dyn Picker,
        inserter: &mut dyn TextInserter,
    ) -> Result<bool> {
        inserter.select_marked(&request.field);

        let Some(index) = picker.pick(request) else {
            tracing::debug!("Choice for field {} cancelled", request.field);
            return Ok(false);
        };
        let Some(choice) = request.choices.get(index) else {
            tracing::warn!(
                "Picker returned choice {} but field {} has {}",
                index,
                request.field,
                request.choices.len()
            );
            return Ok(false);
        };

        inserter.insert_and_mark(&request.field, &choice.text);
        if request.field != EXIT_FIELD && self.can_advance_from(&request.field) {
            inserter.next_field();
            self.move_by(1, picker, inserter)?;
        }
        Ok(true)
    }

    /// Whether `field` is the current field and another field follows it.
    fn can_advance_from(&self, field: &str) -> bool {
        match &self.state {
            NavState::Active(active) => {
                active.current_field() == field && active.current + 1 < active.fields.len()
            }
            NavState::Idle => false,
        }
    }
}
