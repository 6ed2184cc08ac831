//! Providers shipped with the crate.
//!
//! [`BuiltinLoader`] advertises a single source that yields the `DATE`,
//! `CLIPBOARD` and `BUZZWORD` providers. It is always the first loader a
//! registry consults, so external providers claiming the same variable
//! names replace the built-in ones.

mod buzzword;
mod clipboard;
mod date;
mod text;

pub use buzzword::{wrap, BuzzwordProvider};
pub use clipboard::{Clipboard, ClipboardProvider, MemoryClipboard};
pub use date::{DateProvider, DateSource, FixedDate, SystemDate};
pub use text::{EnvProvider, TextProvider};

use std::rc::Rc;

use super::loader::{ProviderLoader, ProviderSource, Providers};
use crate::catalog::ResourceCatalog;
use crate::error::Result;

/// Package name under which built-in providers are registered.
pub const BUILTIN_PACKAGE: &str = "enhanced_snippets";

/// Module name under which built-in providers are registered.
pub const BUILTIN_MODULE: &str = "builtin";

/// Settings the built-in providers need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinOptions {
    pub date_format: String,
    pub buzzword_width: usize,
    pub buzzword_split_chance: u32,
    /// Fixed seed for buzzword text; random when `None`.
    pub buzzword_seed: Option<u64>,
}

impl Default for BuiltinOptions {
    fn default() -> Self {
        Self {
            date_format: "%x".to_string(),
            buzzword_width: 80,
            buzzword_split_chance: 75,
            buzzword_seed: None,
        }
    }
}

/// Loader for the built-in providers.
pub struct BuiltinLoader {
    options: BuiltinOptions,
    dates: Rc<dyn DateSource>,
    clipboard: Rc<dyn Clipboard>,
}

impl BuiltinLoader {
    pub fn new(
        options: BuiltinOptions,
        dates: Rc<dyn DateSource>,
        clipboard: Rc<dyn Clipboard>,
    ) -> Self {
        Self {
            options,
            dates,
            clipboard,
        }
    }

    pub fn source() -> ProviderSource {
        ProviderSource::new(BUILTIN_PACKAGE, BUILTIN_MODULE)
    }
}

impl ProviderLoader for BuiltinLoader {
    fn sources(&self, _catalog: &dyn ResourceCatalog) -> Vec<ProviderSource> {
        vec![Self::source()]
    }

    fn load(
        &mut self,
        _source: &ProviderSource,
        _catalog: &dyn ResourceCatalog,
        _reload: bool,
    ) -> Result<Providers> {
        let buzzword = match self.options.buzzword_seed {
            Some(seed) => BuzzwordProvider::seeded(
                self.options.buzzword_width,
                self.options.buzzword_split_chance,
                seed,
            ),
            None => BuzzwordProvider::new(
                self.options.buzzword_width,
                self.options.buzzword_split_chance,
            ),
        };

        Ok(vec![
            Box::new(DateProvider::new(
                "DATE",
                self.options.date_format.clone(),
                Rc::clone(&self.dates),
            )),
            Box::new(ClipboardProvider::new(Rc::clone(&self.clipboard))),
            Box::new(buzzword),
        ])
    }
}
