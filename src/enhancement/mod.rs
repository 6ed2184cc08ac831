//! Enhancement providers and their registry.
//!
//! A provider expands one custom snippet variable such as `${DATE}`.
//! Providers come from loaders: the built-in loader, packages that ship a
//! provider module, or factories registered in-process.
//!
//! # Example
//!
//! ```
//! use enhanced_snippets::catalog::MemoryCatalog;
//! use enhanced_snippets::enhancement::{EnhancementRegistry, StaticLoader, TextProvider};
//!
//! let loader = StaticLoader::new().with("Acme", "plugin", || {
//!     Ok(vec![Box::new(TextProvider::new("COMPANY", "Acme Corp")) as _])
//! });
//! let mut registry = EnhancementRegistry::new().with_loader(Box::new(loader));
//! registry.rescan(None, &MemoryCatalog::new());
//!
//! assert_eq!(registry.origin_of("COMPANY"), Some("Acme.plugin.TextProvider"));
//! ```

pub mod builtin;
pub mod loader;
pub mod provider;
pub mod registry;

pub use builtin::{
    BuiltinLoader, BuiltinOptions, BuzzwordProvider, Clipboard, ClipboardProvider, DateProvider,
    DateSource, EnvProvider, FixedDate, MemoryClipboard, SystemDate, TextProvider,
};
pub use loader::{
    ManifestLoader, ProviderDecl, ProviderLoader, ProviderModule, ProviderSource, Providers,
    StaticLoader,
};
pub use provider::{variable_pattern, EnhancementProvider, Expansion};
pub use registry::{Collision, EnhancementRegistry, RescanReport};
