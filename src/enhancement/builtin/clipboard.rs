//! `${CLIPBOARD}`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::enhancement::provider::{EnhancementProvider, Expansion};

/// Host clipboard access.
pub trait Clipboard {
    fn text(&self) -> String;
}

/// A clipboard held in memory.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: RefCell<String>,
}

impl MemoryClipboard {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: RefCell::new(text.into()),
        }
    }

    pub fn set(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = text.into();
    }
}

impl Clipboard for MemoryClipboard {
    fn text(&self) -> String {
        self.text.borrow().clone()
    }
}

/// Binds `CLIPBOARD` to the clipboard text. An empty clipboard binds
/// nothing, so a `${CLIPBOARD:default}` keeps its default.
pub struct ClipboardProvider {
    clipboard: Rc<dyn Clipboard>,
}

impl ClipboardProvider {
    pub fn new(clipboard: Rc<dyn Clipboard>) -> Self {
        Self { clipboard }
    }
}

impl EnhancementProvider for ClipboardProvider {
    fn variable_name(&self) -> &str {
        "CLIPBOARD"
    }

    fn type_name(&self) -> &'static str {
        "ClipboardProvider"
    }

    fn expand(&self, content: &str) -> Expansion {
        let text = self.clipboard.text();
        if text.is_empty() {
            return Expansion::unchanged(content);
        }
        Expansion::single(content, "CLIPBOARD", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_clipboard_text() {
        let clipboard = Rc::new(MemoryClipboard::new("copied"));
        let provider = ClipboardProvider::new(clipboard.clone());
        let out = provider.expand("x ${CLIPBOARD} y");
        assert_eq!(out.bindings["CLIPBOARD"], "copied");
        assert_eq!(out.content, "x ${CLIPBOARD} y");

        clipboard.set("changed");
        assert_eq!(provider.expand("${CLIPBOARD}").bindings["CLIPBOARD"], "changed");
    }

    #[test]
    fn empty_clipboard_binds_nothing() {
        let provider = ClipboardProvider::new(Rc::new(MemoryClipboard::default()));
        assert!(provider.expand("${CLIPBOARD:none}").bindings.is_empty());
    }
}
