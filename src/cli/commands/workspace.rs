//! Settings discovery and context construction shared by commands.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::catalog::PackagesDir;
use crate::config::{load_settings, ConfigSource, Settings};
use crate::context::{EnhancedSnippets, Host};
use crate::enhancement::MemoryClipboard;
use crate::error::Result;

/// Where a command runs: the root directory and an optional settings path.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: Option<PathBuf>,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>, config: Option<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load settings, resolving relative paths against the root.
    pub fn settings(&self) -> Result<Settings> {
        let source = ConfigSource::discover(&self.root, self.config.as_deref());
        tracing::debug!("Loading settings from {}", source.path().display());
        let mut settings = load_settings(&source)?;
        settings.packages_path = self.root.join(&settings.packages_path);
        settings.listing_path = settings.listing_path.map(|p| self.root.join(p));
        Ok(settings)
    }

    /// Build a context over the packages tree without scanning it.
    pub fn open(&self, clipboard: Option<&str>, seed: Option<u64>) -> Result<EnhancedSnippets> {
        let settings = self.settings()?;
        let board = MemoryClipboard::new(clipboard.unwrap_or_default());
        let mut host = Host::new(PackagesDir::new(settings.packages_path.clone()))
            .with_clipboard(Rc::new(board));
        if let Some(seed) = seed {
            host = host.with_buzzword_seed(seed);
        }
        Ok(EnhancedSnippets::new(settings, host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn relative_paths_resolve_against_root() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("enhanced-snippets.yml"),
            "packages_path: pkgs\nlisting_path: out/listing.json\n",
        )
        .unwrap();

        let settings = Workspace::new(temp.path(), None).settings().unwrap();
        assert_eq!(settings.packages_path, temp.path().join("pkgs"));
        assert_eq!(
            settings.listing_path,
            Some(temp.path().join("out/listing.json"))
        );
    }

    #[test]
    fn missing_root_settings_use_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = Workspace::new(temp.path(), None).settings().unwrap();
        assert_eq!(settings.packages_path, temp.path().join("Packages"));
    }
}
