//! Snippet registry for enhanced snippets.
//!
//! This module indexes parsed snippets three ways:
//! - by resource id (the primary key)
//! - by owning package
//! - by scope selector
//!
//! Only snippets that reference at least one served enhancement variable
//! are indexed; everything else is left to the host's native snippets.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeSet;
//! use enhanced_snippets::catalog::MemoryCatalog;
//! use enhanced_snippets::registry::SnippetRegistry;
//!
//! let catalog = MemoryCatalog::new()
//!     .with("Packages/User/a.sublime-snippet", "<snippet><content>${DATE}</content></snippet>")
//!     .with("Packages/User/b.sublime-snippet", "<snippet><content>plain</content></snippet>");
//! let served: BTreeSet<String> = ["DATE".to_string()].into();
//!
//! let mut registry = SnippetRegistry::new(vec![".sublime-snippet".into()]);
//! registry.scan(&catalog, &served);
//!
//! assert_eq!(registry.len(), 1);
//! assert!(registry.lookup("Packages/User/a.sublime-snippet").is_some());
//! ```

pub mod index;
pub mod snippets;

pub use index::SnippetIndex;
pub use snippets::{load_snippet, ReloadOutcome, ScanReport, SnippetRegistry};
