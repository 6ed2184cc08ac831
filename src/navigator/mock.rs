//! Recording picker and inserter implementations.
//!
//! `ScriptedPicker` answers prompts from a queue; `RecordingInserter`
//! keeps a log of every call plus the current text of each marked field.
//!
//! # Example
//!
//! ```
//! use enhanced_snippets::navigator::{ChoiceRequest, Picker, ScriptedPicker};
//!
//! let mut picker = ScriptedPicker::new([Some(1)]);
//! let request = ChoiceRequest { field: "1".into(), placeholder: "pick".into(), choices: vec![] };
//! assert_eq!(picker.pick(&request), Some(1));
//! assert_eq!(picker.pick(&request), None);
//! assert_eq!(picker.requests().len(), 2);
//! ```

use std::collections::{BTreeMap, VecDeque};

use super::host::{ChoiceRequest, Picker, TextInserter};

/// Picker that replays queued answers; an empty queue cancels.
#[derive(Debug, Default)]
pub struct ScriptedPicker {
    answers: VecDeque<Option<usize>>,
    requests: Vec<ChoiceRequest>,
}

impl ScriptedPicker {
    pub fn new(answers: impl IntoIterator<Item = Option<usize>>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            requests: Vec::new(),
        }
    }

    pub fn push(&mut self, answer: Option<usize>) {
        self.answers.push_back(answer);
    }

    /// Every request shown so far.
    pub fn requests(&self) -> &[ChoiceRequest] {
        &self.requests
    }
}

impl Picker for ScriptedPicker {
    fn pick(&mut self, request: &ChoiceRequest) -> Option<usize> {
        self.requests.push(request.clone());
        self.answers.pop_front().flatten()
    }
}

/// One call made to a [`RecordingInserter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertEvent {
    Insert { field: String, text: String },
    Select { field: String },
    Erase { field: String },
    NextField,
}

/// Inserter that records calls and tracks marked text per field.
#[derive(Debug, Default)]
pub struct RecordingInserter {
    events: Vec<InsertEvent>,
    marks: BTreeMap<String, String>,
}

impl RecordingInserter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[InsertEvent] {
        &self.events
    }

    /// Text currently marked for each field.
    pub fn marks(&self) -> &BTreeMap<String, String> {
        &self.marks
    }
}

impl TextInserter for RecordingInserter {
    fn insert_and_mark(&mut self, field: &str, text: &str) {
        self.events.push(InsertEvent::Insert {
            field: field.to_string(),
            text: text.to_string(),
        });
        self.marks.insert(field.to_string(), text.to_string());
    }

    fn select_marked(&mut self, field: &str) -> bool {
        self.events.push(InsertEvent::Select {
            field: field.to_string(),
        });
        self.marks.contains_key(field)
    }

    fn erase_marks(&mut self, field: &str) {
        self.events.push(InsertEvent::Erase {
            field: field.to_string(),
        });
        self.marks.remove(field);
    }

    fn next_field(&mut self) {
        self.events.push(InsertEvent::NextField);
    }
}
