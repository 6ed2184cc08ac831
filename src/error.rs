//! Error types for snippet loading, enhancement discovery and expansion.
//!
//! This module defines [`SnippetError`], the error type used throughout the
//! crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Per-resource and per-provider failures (`Format`, `Validation`,
//!   `ProviderLoad`) are contained at the loop that iterates resources or
//!   providers; they are logged and never abort a batch
//! - `InvalidArguments` is rejected before any work begins
//! - Loaders may build context with `anyhow` internally; it is flattened
//!   into the message of the `SnippetError` they return

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for enhanced snippet operations.
#[derive(Debug, Error)]
pub enum SnippetError {
    /// Content matches neither supported snippet format.
    #[error("Unrecognized snippet format in {resource}")]
    Format { resource: String },

    /// A recognized format with a missing or malformed required field.
    #[error("Invalid snippet {resource}: {message}")]
    Validation { resource: String, message: String },

    /// An advertised provider module could not be loaded.
    #[error("Failed to load enhancements from '{source_id}': {message}")]
    ProviderLoad { source_id: String, message: String },

    /// `insert` was given a resource that resolves to nothing.
    #[error("No snippet found for '{name}'")]
    LookupMiss { name: String },

    /// A command was called with a bad combination of arguments.
    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// A field move would leave the navigator outside its field list.
    #[error("Cannot move to field index {index}; snippet has {len} fields")]
    FieldMove { index: isize, len: usize },

    /// A catalog resource does not exist.
    #[error("Resource not found: {resource}")]
    ResourceNotFound { resource: String },

    /// Settings file not found at the expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a settings file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Settings parsed but hold unusable values.
    #[error("Invalid configuration: {message}")]
    ConfigValidation { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error wrapper.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

}

impl SnippetError {
    /// Shorthand for a [`SnippetError::Validation`].
    pub fn validation(resource: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            resource: resource.to_string(),
            message: message.into(),
        }
    }

    /// Whether this error is contained per resource during a scan.
    pub fn is_resource_local(&self) -> bool {
        matches!(
            self,
            Self::Format { .. } | Self::Validation { .. } | Self::ResourceNotFound { .. }
        )
    }
}

/// Result type alias for enhanced snippet operations.
pub type Result<T> = std::result::Result<T, SnippetError>;
