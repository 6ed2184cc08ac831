//! Settings loading and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use enhanced_snippets::config::{load_settings, ConfigSource};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("enhanced-snippets.yml"), "date_format: '%d.%m.%Y'").unwrap();
//!
//! let source = ConfigSource::discover(temp.path(), None);
//! # if std::env::var_os("ENHANCED_SNIPPETS_CONFIG").is_none() {
//! let settings = load_settings(&source).unwrap();
//! assert_eq!(settings.date_format, "%d.%m.%Y");
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{load_settings, parse_settings, ConfigSource, CONFIG_ENV, CONFIG_FILE};
pub use schema::Settings;
pub use validator::validate;
