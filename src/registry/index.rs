//! The three snippet indexes and the rules that keep them consistent.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::snippet::Snippet;

/// Snippets keyed by resource, plus package and scope buckets.
///
/// Every resource in `by_resource` sits in exactly one package bucket and
/// exactly one scope bucket. Empty buckets are removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnippetIndex {
    by_resource: BTreeMap<String, Arc<Snippet>>,
    by_package: BTreeMap<String, BTreeSet<String>>,
    by_scope: BTreeMap<String, BTreeSet<String>>,
}

impl SnippetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a snippet, replacing any snippet with the same resource.
    ///
    /// Returns the replaced snippet.
    pub fn insert(&mut self, snippet: Snippet) -> Option<Arc<Snippet>> {
        let resource = snippet.resource().to_string();
        let previous = self.remove(&resource);

        self.by_package
            .entry(snippet.package().to_string())
            .or_default()
            .insert(resource.clone());
        self.by_scope
            .entry(snippet.scope().to_string())
            .or_default()
            .insert(resource.clone());
        self.by_resource.insert(resource, Arc::new(snippet));
        previous
    }

    /// Remove one resource from all three indexes.
    pub fn remove(&mut self, resource: &str) -> Option<Arc<Snippet>> {
        let snippet = self.by_resource.remove(resource)?;
        detach(&mut self.by_package, snippet.package(), resource);
        detach(&mut self.by_scope, snippet.scope(), resource);
        Some(snippet)
    }

    /// Remove every resource in a package. Returns how many were removed.
    pub fn remove_package(&mut self, package: &str) -> usize {
        let resources = self.by_package.get(package).cloned().unwrap_or_default();
        resources.iter().filter(|r| self.remove(r).is_some()).count()
    }

    /// Remove every resource whose scope key satisfies `pred`.
    pub fn remove_scopes<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        let resources: Vec<String> = self
            .by_scope
            .iter()
            .filter(|(scope, _)| pred(scope))
            .flat_map(|(_, set)| set.iter().cloned())
            .collect();
        resources.iter().filter(|r| self.remove(r).is_some()).count()
    }

    pub fn get(&self, resource: &str) -> Option<&Arc<Snippet>> {
        self.by_resource.get(resource)
    }

    pub fn contains(&self, resource: &str) -> bool {
        self.by_resource.contains_key(resource)
    }

    /// Snippets in a package, sorted by resource.
    pub fn in_package(&self, package: &str) -> Vec<Arc<Snippet>> {
        self.collect(self.by_package.get(package))
    }

    /// Snippets with exactly this scope key, sorted by resource.
    pub fn in_scope(&self, scope: &str) -> Vec<Arc<Snippet>> {
        self.collect(self.by_scope.get(scope))
    }

    fn collect(&self, bucket: Option<&BTreeSet<String>>) -> Vec<Arc<Snippet>> {
        bucket
            .into_iter()
            .flatten()
            .filter_map(|r| self.by_resource.get(r).cloned())
            .collect()
    }

    /// Resource ids in a package bucket.
    pub fn package_resources(&self, package: &str) -> Option<&BTreeSet<String>> {
        self.by_package.get(package)
    }

    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.by_package.keys().map(String::as_str)
    }

    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.by_scope.keys().map(String::as_str)
    }

    /// All snippets, sorted by resource.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Snippet>> {
        self.by_resource.values()
    }

    pub fn len(&self) -> usize {
        self.by_resource.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_resource.is_empty()
    }

    /// Whether every bucket entry refers to a stored snippet filed under
    /// that bucket, every snippet is in both of its buckets, and no bucket
    /// is empty.
    pub fn is_consistent(&self) -> bool {
        let buckets_ok = |buckets: &BTreeMap<String, BTreeSet<String>>,
                          key: fn(&Snippet) -> &str| {
            buckets.iter().all(|(k, set)| {
                !set.is_empty()
                    && set.iter().all(|r| {
                        self.by_resource
                            .get(r)
                            .is_some_and(|s| key(s) == k.as_str())
                    })
            })
        };
        let filed = self.by_resource.iter().all(|(r, s)| {
            s.resource() == r
                && self.by_package.get(s.package()).is_some_and(|b| b.contains(r))
                && self.by_scope.get(s.scope()).is_some_and(|b| b.contains(r))
        });

        filed
            && buckets_ok(&self.by_package, Snippet::package)
            && buckets_ok(&self.by_scope, Snippet::scope)
    }
}

fn detach(buckets: &mut BTreeMap<String, BTreeSet<String>>, key: &str, resource: &str) {
    if let Some(set) = buckets.get_mut(key) {
        set.remove(resource);
        if set.is_empty() {
            buckets.remove(key);
        }
    }
}
