//! The snippet registry.
//!
//! [`SnippetRegistry`] owns the published [`SnippetIndex`] generation.
//! Full scans build a fresh index and swap it in. Incremental operations
//! edit the current generation in place, copying it first only while a
//! reader still holds a snapshot, so a snapshot is never modified after it
//! was handed out.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::index::SnippetIndex;
use crate::catalog::{find_resources, package_prefix, ResourceCatalog};
use crate::error::{Result, SnippetError};
use crate::scope::{applies, ApplicabilityContext, ScopeMatcher};
use crate::snippet::{parse, Snippet};

/// Outcome of a scan over many resources.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Resources parsed and indexed.
    pub indexed: usize,
    /// Resources parsed but referencing no served variable.
    pub plain: usize,
    /// Resources that failed to parse.
    pub failures: Vec<SnippetError>,
}

/// What happened to a single reloaded resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Parsed and indexed (or re-indexed).
    Indexed,
    /// Parsed but not enhanced; any previous entry was removed.
    Plain,
    /// Failed to load or parse; any previous entry was removed.
    Failed,
}

/// Authoritative collection of enhanced snippets.
#[derive(Debug, Clone)]
pub struct SnippetRegistry {
    index: Arc<SnippetIndex>,
    extensions: Vec<String>,
    mutations: u64,
}

impl SnippetRegistry {
    /// A registry that picks up resources ending in one of `extensions`.
    pub fn new(extensions: Vec<String>) -> Self {
        Self {
            index: Arc::new(SnippetIndex::new()),
            extensions,
            mutations: 0,
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Whether `resource` has a snippet file extension.
    pub fn is_snippet_resource(&self, resource: &str) -> bool {
        self.extensions.iter().any(|e| resource.ends_with(e.as_str()))
    }

    /// The current generation of the index.
    pub fn snapshot(&self) -> Arc<SnippetIndex> {
        Arc::clone(&self.index)
    }

    /// Bumped on every change to the published index.
    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    fn publish(&mut self, index: SnippetIndex) {
        self.index = Arc::new(index);
        self.mutations += 1;
    }

    /// Apply `f` to the current generation. `f` reports whether it changed
    /// anything; only changes count as mutations.
    fn edit<F, T>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut SnippetIndex) -> (T, bool),
    {
        let (out, changed) = f(Arc::make_mut(&mut self.index));
        if changed {
            self.mutations += 1;
        }
        out
    }

    /// Rebuild every index from the catalog.
    ///
    /// Only snippets referencing at least one name in `served` are kept.
    pub fn scan(
        &mut self,
        catalog: &dyn ResourceCatalog,
        served: &BTreeSet<String>,
    ) -> ScanReport {
        let mut next = SnippetIndex::new();
        let report = load_into(&self.extensions, &mut next, catalog, served, "");
        tracing::info!(
            "Indexed {} enhanced snippets ({} plain, {} failed)",
            report.indexed,
            report.plain,
            report.failures.len()
        );
        self.publish(next);
        report
    }

    /// Drop and rescan the resources of one package.
    pub fn scan_package(
        &mut self,
        package: &str,
        catalog: &dyn ResourceCatalog,
        served: &BTreeSet<String>,
    ) -> ScanReport {
        let before = self.index.in_package(package);
        let index = Arc::make_mut(&mut self.index);
        index.remove_package(package);
        let report = load_into(
            &self.extensions,
            index,
            catalog,
            served,
            &package_prefix(package),
        );
        if index.in_package(package) != before {
            self.mutations += 1;
        }
        tracing::debug!(
            "Rescanned package {}: {} enhanced snippets",
            package,
            report.indexed
        );
        report
    }

    /// Reload one resource after it changed on disk.
    pub fn reload_resource(
        &mut self,
        resource: &str,
        catalog: &dyn ResourceCatalog,
        served: &BTreeSet<String>,
    ) -> ReloadOutcome {
        match load_snippet(catalog, resource) {
            Ok(snippet) if is_enhanced(&snippet, served) => {
                self.add(snippet);
                ReloadOutcome::Indexed
            }
            Ok(_) => {
                self.discard(resource);
                ReloadOutcome::Plain
            }
            Err(e) => {
                tracing::warn!("Dropping snippet: {}", e);
                self.discard(resource);
                ReloadOutcome::Failed
            }
        }
    }

    /// Index a snippet, replacing any entry for the same resource.
    pub fn add(&mut self, snippet: Snippet) {
        tracing::debug!("Adding snippet {}", snippet.resource());
        self.edit(|index| {
            let resource = snippet.resource().to_string();
            let previous = index.insert(snippet);
            let changed = previous.as_ref() != index.get(&resource);
            ((), changed)
        });
    }

    /// Remove one resource. Returns whether it was indexed.
    pub fn discard(&mut self, resource: &str) -> bool {
        if !self.index.contains(resource) {
            return false;
        }
        self.edit(|index| (index.remove(resource).is_some(), true));
        tracing::debug!("Discarded snippet {}", resource);
        true
    }

    /// Remove every snippet in `package`.
    pub fn discard_package(&mut self, package: &str) -> usize {
        if self.index.package_resources(package).is_none() {
            return 0;
        }
        let removed = self.edit(|index| {
            let removed = index.remove_package(package);
            (removed, removed > 0)
        });
        tracing::debug!("Discarded {} snippets from package {}", removed, package);
        removed
    }

    /// Remove every snippet whose scope is matched by `selector`.
    pub fn discard_scope(&mut self, selector: &str, matcher: &dyn ScopeMatcher) -> usize {
        let matched = |scope: &str| !scope.is_empty() && matcher.matches(selector, scope);
        if !self.index.scopes().any(matched) {
            return 0;
        }
        let removed = self.edit(|index| {
            let removed = index.remove_scopes(matched);
            (removed, removed > 0)
        });
        tracing::debug!("Discarded {} snippets matching '{}'", removed, selector);
        removed
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        if !self.index.is_empty() {
            self.publish(SnippetIndex::new());
        }
    }

    pub fn lookup(&self, resource: &str) -> Option<Arc<Snippet>> {
        self.index.get(resource).cloned()
    }

    pub fn by_package(&self, package: &str) -> Vec<Arc<Snippet>> {
        self.index.in_package(package)
    }

    /// Snippets whose scope is matched by `selector`.
    pub fn matching_scope(
        &self,
        selector: &str,
        matcher: &dyn ScopeMatcher,
    ) -> Vec<Arc<Snippet>> {
        let scopes: Vec<&str> = self
            .index
            .scopes()
            .filter(|scope| !scope.is_empty() && matcher.matches(selector, scope))
            .collect();
        scopes.into_iter().flat_map(|s| self.index.in_scope(s)).collect()
    }

    /// Snippets that apply in `context`.
    pub fn matches(
        &self,
        context: &ApplicabilityContext,
        matcher: &dyn ScopeMatcher,
    ) -> Vec<Arc<Snippet>> {
        self.index
            .iter()
            .filter(|s| applies(matcher, s.scope(), s.glob(), context))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Load and parse one resource.
pub fn load_snippet(catalog: &dyn ResourceCatalog, resource: &str) -> Result<Snippet> {
    let raw = catalog.load(resource)?;
    parse(&raw, resource)
}

/// Parse every snippet resource under `prefix` into `index`, keeping the
/// enhanced ones.
fn load_into(
    extensions: &[String],
    index: &mut SnippetIndex,
    catalog: &dyn ResourceCatalog,
    served: &BTreeSet<String>,
    prefix: &str,
) -> ScanReport {
    let mut report = ScanReport::default();
    for resource in find_resources(catalog, extensions, prefix) {
        match load_snippet(catalog, &resource) {
            Ok(snippet) if is_enhanced(&snippet, served) => {
                index.insert(snippet);
                report.indexed += 1;
            }
            Ok(_) => report.plain += 1,
            Err(e) => {
                tracing::warn!("Skipping snippet: {}", e);
                report.failures.push(e);
            }
        }
    }
    report
}

fn is_enhanced(snippet: &Snippet, served: &BTreeSet<String>) -> bool {
    snippet.variables().iter().any(|v| served.contains(v))
}
