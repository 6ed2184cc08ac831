//! Enhanced snippets: computed variables, multi-choice fields and a live
//! snippet index for editor snippets.
//!
//! Snippets are read from a packages tree in either the markup format or
//! the metadata-block format. A snippet is "enhanced" when its body names
//! a variable some registered provider serves (`${DATE}`, `${CLIPBOARD}`,
//! `${BUZZWORD:3}`, or anything a package declares). Expanding a snippet
//! runs those providers and yields the final arguments for the editor's
//! native insert.
//!
//! # Modules
//!
//! - [`catalog`] - Resource enumeration over a packages tree
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Settings loading and validation
//! - [`context`] - The owned application context
//! - [`enhancement`] - Providers, loaders and the provider registry
//! - [`error`] - Error types and result aliases
//! - [`expansion`] - The expansion pipeline
//! - [`listing`] - The command-palette listing artifact
//! - [`navigator`] - Field navigation with choice prompts
//! - [`registry`] - The snippet index and its registry
//! - [`schedule`] - Clocks and debouncing
//! - [`scope`] - Scope and filename applicability
//! - [`snippet`] - The snippet model and both file formats
//! - [`ui`] - Terminal output and prompts
//! - [`watcher`] - Ignored-package change tracking
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use std::rc::Rc;
//! use enhanced_snippets::catalog::MemoryCatalog;
//! use enhanced_snippets::config::Settings;
//! use enhanced_snippets::context::{EnhancedSnippets, Host, InsertRequest};
//! use enhanced_snippets::enhancement::FixedDate;
//! use enhanced_snippets::navigator::RecordingInserter;
//!
//! let catalog = MemoryCatalog::new().with(
//!     "Packages/User/hello.sublime-snippet",
//!     "<snippet><content>Hello ${1:name}, today is ${DATE}</content></snippet>",
//! );
//! let settings = Settings { date_format: "%Y-%m-%d".into(), ..Default::default() };
//! let host = Host::new(catalog).with_dates(Rc::new(FixedDate::ymd(2024, 1, 1)));
//!
//! let mut system = EnhancedSnippets::new(settings, host);
//! system.refresh();
//!
//! let args = system
//!     .insert(
//!         1,
//!         &InsertRequest::by_name("Packages/User/hello.sublime-snippet"),
//!         &BTreeMap::new(),
//!         &mut RecordingInserter::new(),
//!     )
//!     .unwrap();
//! assert_eq!(args.bindings["DATE"], "2024-01-01");
//! assert_eq!(system.navigator(1).unwrap().current_field(), Some("1"));
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod context;
pub mod enhancement;
pub mod error;
pub mod expansion;
pub mod listing;
pub mod navigator;
pub mod registry;
pub mod schedule;
pub mod scope;
pub mod snippet;
pub mod ui;
pub mod watcher;

pub use context::{EnhancedSnippets, Host, InsertRequest};
pub use error::{Result, SnippetError};
