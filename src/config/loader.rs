//! Settings file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use super::schema::Settings;
use super::validator::validate;
use crate::error::{Result, SnippetError};

/// Environment variable naming a settings file.
pub const CONFIG_ENV: &str = "ENHANCED_SNIPPETS_CONFIG";

/// Settings file looked for in the root directory.
pub const CONFIG_FILE: &str = "enhanced-snippets.yml";

/// Where settings come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line; must exist.
    Explicit(PathBuf),
    /// Named by `$ENHANCED_SNIPPETS_CONFIG`; must exist.
    Environment(PathBuf),
    /// `<root>/enhanced-snippets.yml`; optional.
    Root(PathBuf),
}

impl ConfigSource {
    /// Pick the settings file for `root`.
    ///
    /// Priority: `explicit`, then `$ENHANCED_SNIPPETS_CONFIG`, then the
    /// file in `root`.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::Explicit(path.to_path_buf());
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::Environment(PathBuf::from(path)),
            _ => Self::Root(root.join(CONFIG_FILE)),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Explicit(p) | Self::Environment(p) | Self::Root(p) => p,
        }
    }

    fn required(&self) -> bool {
        !matches!(self, Self::Root(_))
    }
}

/// Load and validate settings from `source`.
///
/// A missing optional file yields defaults.
///
/// # Errors
///
/// Returns `ConfigNotFound` when a required file is missing,
/// `ConfigParse` when the YAML is invalid and `ConfigValidation` when a
/// value is unusable.
pub fn load_settings(source: &ConfigSource) -> Result<Settings> {
    let path = source.path();
    let settings = match fs::read_to_string(path) {
        Ok(content) => parse_settings(&content, path)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if source.required() {
                return Err(SnippetError::ConfigNotFound {
                    path: path.to_path_buf(),
                });
            }
            tracing::debug!("No settings at {}, using defaults", path.display());
            Settings::default()
        }
        Err(e) => return Err(SnippetError::Io(e)),
    };

    validate(&settings)?;
    Ok(settings)
}

/// Parse YAML settings.
///
/// An empty document yields defaults.
pub fn parse_settings(content: &str, source_path: &Path) -> Result<Settings> {
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(content).map_err(|e| SnippetError::ConfigParse {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
