//! Resource enumeration and loading.
//!
//! Resources are identified by path-like ids of the form
//! `Packages/<package>/<relative path>`. The [`ResourceCatalog`] trait is the
//! seam to whatever owns the files: [`PackagesDir`] serves a directory of
//! packages, [`MemoryCatalog`] serves in-memory content.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Result, SnippetError};
use crate::snippet::package_of;

/// Leading segment of every resource id.
pub const RESOURCE_ROOT: &str = "Packages";

/// Source of snippet and provider resources.
pub trait ResourceCatalog {
    /// Every resource id currently known, in any order.
    fn list(&self) -> Vec<String>;

    /// Raw bytes of one resource.
    fn load(&self, resource: &str) -> Result<Vec<u8>>;

    /// Map a filesystem path back to its resource id, if it has one.
    fn resource_for_path(&self, _path: &Path) -> Option<String> {
        None
    }
}

/// Resources whose id ends with one of `suffixes` and starts with `prefix`,
/// sorted by id.
pub fn find_resources(
    catalog: &dyn ResourceCatalog,
    suffixes: &[String],
    prefix: &str,
) -> Vec<String> {
    let mut found: Vec<String> = catalog
        .list()
        .into_iter()
        .filter(|r| r.starts_with(prefix))
        .filter(|r| suffixes.iter().any(|s| r.ends_with(s.as_str())))
        .collect();
    found.sort();
    found
}

/// The resource prefix covering everything in one package.
pub fn package_prefix(package: &str) -> String {
    format!("{}/{}/", RESOURCE_ROOT, package)
}

/// A directory whose immediate children are packages.
#[derive(Debug, Clone)]
pub struct PackagesDir {
    root: PathBuf,
}

impl PackagesDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, resource: &str) -> Option<PathBuf> {
        let rest = resource.strip_prefix(RESOURCE_ROOT)?.strip_prefix('/')?;
        let rel = Path::new(rest);
        if rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(rel))
    }

    fn collect(&self, dir: &Path, found: &mut Vec<String>) -> std::io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                self.collect(&path, found)?;
            } else if let Some(resource) = self.resource_for_path(&path) {
                found.push(resource);
            }
        }
        Ok(())
    }
}

impl ResourceCatalog for PackagesDir {
    fn list(&self) -> Vec<String> {
        let mut found = Vec::new();
        if !self.root.is_dir() {
            return found;
        }
        if let Err(e) = self.collect(&self.root, &mut found) {
            tracing::warn!("Failed to enumerate {}: {}", self.root.display(), e);
        }
        found
    }

    fn load(&self, resource: &str) -> Result<Vec<u8>> {
        let path = self
            .path_for(resource)
            .ok_or_else(|| SnippetError::ResourceNotFound {
                resource: resource.to_string(),
            })?;
        fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SnippetError::ResourceNotFound {
                    resource: resource.to_string(),
                }
            } else {
                SnippetError::Io(e)
            }
        })
    }

    fn resource_for_path(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let segments: Vec<&str> = rel
            .components()
            .map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect::<Option<_>>()?;
        // A file directly under the root belongs to no package.
        if segments.len() < 2 {
            return None;
        }
        Some(format!("{}/{}", RESOURCE_ROOT, segments.join("/")))
    }
}

/// In-memory resources, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    resources: BTreeMap<String, Vec<u8>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a resource.
    pub fn insert(&mut self, resource: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.resources.insert(resource.into(), content.into());
    }

    /// Builder form of [`MemoryCatalog::insert`].
    pub fn with(mut self, resource: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(resource, content);
        self
    }

    pub fn remove(&mut self, resource: &str) -> bool {
        self.resources.remove(resource).is_some()
    }
}

impl ResourceCatalog for MemoryCatalog {
    fn list(&self) -> Vec<String> {
        self.resources.keys().cloned().collect()
    }

    fn load(&self, resource: &str) -> Result<Vec<u8>> {
        self.resources
            .get(resource)
            .cloned()
            .ok_or_else(|| SnippetError::ResourceNotFound {
                resource: resource.to_string(),
            })
    }
}

/// A view of a catalog with ignored packages hidden.
pub struct IgnoringCatalog<'a> {
    inner: &'a dyn ResourceCatalog,
    ignored: &'a BTreeSet<String>,
}

impl<'a> IgnoringCatalog<'a> {
    pub fn new(inner: &'a dyn ResourceCatalog, ignored: &'a BTreeSet<String>) -> Self {
        Self { inner, ignored }
    }

    fn visible(&self, resource: &str) -> bool {
        !self.ignored.contains(package_of(resource))
    }
}

impl ResourceCatalog for IgnoringCatalog<'_> {
    fn list(&self) -> Vec<String> {
        self.inner
            .list()
            .into_iter()
            .filter(|r| self.visible(r))
            .collect()
    }

    fn load(&self, resource: &str) -> Result<Vec<u8>> {
        if !self.visible(resource) {
            return Err(SnippetError::ResourceNotFound {
                resource: resource.to_string(),
            });
        }
        self.inner.load(resource)
    }

    fn resource_for_path(&self, path: &Path) -> Option<String> {
        self.inner
            .resource_for_path(path)
            .filter(|r| self.visible(r))
    }
}
