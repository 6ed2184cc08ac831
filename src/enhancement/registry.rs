//! Live providers, indexed by variable name and by origin.
//!
//! The [`EnhancementRegistry`] holds at most one provider per variable
//! name. Each provider is stamped with an origin (`package.module.Type`)
//! used to resolve collisions and to evict everything a package
//! contributed. Registered loaders are consulted, in order, by
//! [`EnhancementRegistry::rescan`].

use std::collections::{BTreeMap, BTreeSet};

use super::loader::{ProviderLoader, ProviderSource};
use super::provider::EnhancementProvider;
use crate::catalog::ResourceCatalog;
use crate::error::SnippetError;

/// Two origins claimed the same variable; the newer one won.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub variable: String,
    pub previous_origin: String,
    pub origin: String,
}

struct Registered {
    origin: String,
    package: String,
    generation: u64,
    provider: Box<dyn EnhancementProvider>,
}

/// Outcome of one [`EnhancementRegistry::rescan`] pass.
#[derive(Debug, Default)]
pub struct RescanReport {
    /// Sources that loaded successfully.
    pub loaded: Vec<ProviderSource>,
    /// Providers registered during the pass.
    pub registered: usize,
    pub collisions: Vec<Collision>,
    /// Sources that failed to load.
    pub failures: Vec<SnippetError>,
}

/// Registry of enhancement providers.
#[derive(Default)]
pub struct EnhancementRegistry {
    by_name: BTreeMap<String, Registered>,
    by_origin: BTreeMap<String, BTreeSet<String>>,
    generations: BTreeMap<String, u64>,
    loaders: Vec<Box<dyn ProviderLoader>>,
}

impl EnhancementRegistry {
    /// Create an empty registry with no loaders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a loader. Loaders are consulted in the order added.
    pub fn add_loader(&mut self, loader: Box<dyn ProviderLoader>) {
        self.loaders.push(loader);
    }

    /// Builder form of [`EnhancementRegistry::add_loader`].
    pub fn with_loader(mut self, loader: Box<dyn ProviderLoader>) -> Self {
        self.add_loader(loader);
        self
    }

    /// Register a provider declared by `module` (a `package.module` id).
    ///
    /// Returns the collision when a provider from another origin already
    /// served the same variable. That provider is evicted; a provider from
    /// the same origin is replaced silently.
    pub fn register(
        &mut self,
        module: &str,
        provider: Box<dyn EnhancementProvider>,
    ) -> Option<Collision> {
        let package = module.rsplit_once('.').map_or(module, |(package, _)| package);
        self.insert(package.to_string(), module, provider)
    }

    fn insert(
        &mut self,
        package: String,
        module: &str,
        provider: Box<dyn EnhancementProvider>,
    ) -> Option<Collision> {
        let origin = format!("{}.{}", module, provider.type_name());
        let name = provider.variable_name().to_string();
        let generation = self.generations.get(module).copied().unwrap_or(0);

        let collision = self.unregister(&name).and_then(|previous| {
            (previous.origin != origin).then(|| {
                tracing::warn!(
                    "Enhancement variable '{}' from {} replaces the one from {}",
                    name,
                    origin,
                    previous.origin
                );
                Collision {
                    variable: name.clone(),
                    previous_origin: previous.origin,
                    origin: origin.clone(),
                }
            })
        });

        tracing::debug!("Registered {} provider from {}", name, origin);
        self.by_origin
            .entry(origin.clone())
            .or_default()
            .insert(name.clone());
        self.by_name.insert(
            name,
            Registered {
                origin,
                package,
                generation,
                provider,
            },
        );
        collision
    }

    fn unregister(&mut self, name: &str) -> Option<Registered> {
        let previous = self.by_name.remove(name)?;
        if let Some(names) = self.by_origin.get_mut(&previous.origin) {
            names.remove(name);
            if names.is_empty() {
                self.by_origin.remove(&previous.origin);
            }
        }
        Some(previous)
    }

    /// Remove every provider whose origin starts with `filter`.
    ///
    /// Returns the number of providers removed.
    pub fn evict(&mut self, filter: &str) -> usize {
        let origins: Vec<String> = self
            .by_origin
            .keys()
            .filter(|o| o.starts_with(filter))
            .cloned()
            .collect();

        let mut removed = 0;
        for origin in origins {
            for name in self.by_origin.remove(&origin).unwrap_or_default() {
                self.by_name.remove(&name);
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::debug!("Evicted {} providers matching '{}'", removed, filter);
        }
        removed
    }

    /// Remove every provider contributed by `package`. Unlike
    /// [`EnhancementRegistry::evict`] this compares the whole package name,
    /// so `Foo` leaves `Foo.Extras` alone.
    pub fn evict_package(&mut self, package: &str) -> usize {
        let names: Vec<String> = self
            .by_name
            .iter()
            .filter(|(_, r)| r.package == package)
            .map(|(name, _)| name.clone())
            .collect();
        for name in &names {
            self.unregister(name);
        }
        if !names.is_empty() {
            tracing::debug!("Evicted {} providers from package {}", names.len(), package);
        }
        names.len()
    }

    /// Drop the providers of one source, matching its id exactly.
    fn evict_source(&mut self, id: &str) {
        let origins: Vec<String> = self
            .by_origin
            .keys()
            .filter(|origin| {
                origin
                    .strip_prefix(id)
                    .and_then(|rest| rest.strip_prefix('.'))
                    .is_some_and(|type_name| !type_name.contains('.'))
            })
            .cloned()
            .collect();
        for origin in origins {
            for name in self.by_origin.remove(&origin).unwrap_or_default() {
                self.by_name.remove(&name);
            }
        }
    }

    /// Drop and reload the providers of one package only.
    pub fn rescan_package(
        &mut self,
        package: &str,
        catalog: &dyn ResourceCatalog,
    ) -> RescanReport {
        self.evict_package(package);
        self.discover(catalog, |source| source.package == package)
    }

    /// Clear and rediscover providers.
    ///
    /// With no filter every provider is dropped and every loader's sources
    /// are loaded again. With a filter only providers whose origin starts
    /// with it are dropped and only sources whose id starts with it are
    /// reloaded. A source that fails to load is reported and skipped.
    pub fn rescan(
        &mut self,
        filter: Option<&str>,
        catalog: &dyn ResourceCatalog,
    ) -> RescanReport {
        match filter {
            None => {
                self.by_name.clear();
                self.by_origin.clear();
            }
            Some(f) => {
                self.evict(f);
            }
        }

        self.discover(catalog, |source| {
            filter.is_none_or(|f| source.id().starts_with(f))
        })
    }

    fn discover<F>(&mut self, catalog: &dyn ResourceCatalog, wanted: F) -> RescanReport
    where
        F: Fn(&ProviderSource) -> bool,
    {
        let mut report = RescanReport::default();
        let mut loaders = std::mem::take(&mut self.loaders);
        for loader in loaders.iter_mut() {
            for source in loader.sources(catalog) {
                if wanted(&source) {
                    self.load_source(loader.as_mut(), &source, catalog, &mut report);
                }
            }
        }
        self.loaders = loaders;

        tracing::info!(
            "Loaded {} enhancement providers from {} sources",
            report.registered,
            report.loaded.len()
        );
        report
    }

    fn load_source(
        &mut self,
        loader: &mut dyn ProviderLoader,
        source: &ProviderSource,
        catalog: &dyn ResourceCatalog,
        report: &mut RescanReport,
    ) {
        let id = source.id();
        let reload = self.generations.contains_key(&id);

        let providers = match loader.load(source, catalog, reload) {
            Ok(providers) => providers,
            Err(e) => {
                let e = match e {
                    e @ SnippetError::ProviderLoad { .. } => e,
                    other => SnippetError::ProviderLoad {
                        source_id: id.clone(),
                        message: other.to_string(),
                    },
                };
                tracing::warn!("{}", e);
                report.failures.push(e);
                return;
            }
        };

        // Drop whatever an older generation of this source left behind.
        self.evict_source(&id);
        *self.generations.entry(id.clone()).or_insert(0) += 1;

        for provider in providers {
            if let Some(collision) = self.insert(source.package.clone(), &id, provider) {
                report.collisions.push(collision);
            }
            report.registered += 1;
        }
        report.loaded.push(source.clone());
    }

    /// Live providers for `names`, in the order given. Names with no
    /// provider are skipped.
    pub fn providers_for<'a, I>(&self, names: I) -> Vec<&dyn EnhancementProvider>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .filter_map(|name| self.get(name))
            .collect()
    }

    /// The provider serving `name`.
    pub fn get(&self, name: &str) -> Option<&dyn EnhancementProvider> {
        self.by_name.get(name).map(|r| r.provider.as_ref())
    }

    /// Origin of the provider serving `name`.
    pub fn origin_of(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(|r| r.origin.as_str())
    }

    /// Generation of the provider serving `name`.
    pub fn generation_of(&self, name: &str) -> Option<u64> {
        self.by_name.get(name).map(|r| r.generation)
    }

    /// How many times the source `id` has been loaded.
    pub fn source_generation(&self, id: &str) -> u64 {
        self.generations.get(id).copied().unwrap_or(0)
    }

    /// Variable names served by some provider.
    pub fn served_names(&self) -> BTreeSet<String> {
        self.by_name.keys().cloned().collect()
    }

    /// Whether any name in `names` is served.
    pub fn serves_any<'a, I>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        names.into_iter().any(|n| self.by_name.contains_key(n))
    }

    /// Variable names contributed by `origin`.
    pub fn names_from(&self, origin: &str) -> Option<&BTreeSet<String>> {
        self.by_origin.get(origin)
    }

    /// Every origin with at least one live provider.
    pub fn origins(&self) -> impl Iterator<Item = &str> {
        self.by_origin.keys().map(String::as_str)
    }

    /// `(variable, origin)` pairs sorted by variable.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_name
            .iter()
            .map(|(name, r)| (name.as_str(), r.origin.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::enhancement::builtin::TextProvider;
    use crate::enhancement::loader::{Providers, StaticLoader};
    use crate::error::Result;

    fn text(name: &str, value: &str) -> Box<dyn EnhancementProvider> {
        Box::new(TextProvider::new(name, value))
    }

    fn texts(pairs: &'static [(&'static str, &'static str)]) -> impl Fn() -> Result<Providers> {
        move || Ok(pairs.iter().map(|(n, v)| text(n, v)).collect())
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = EnhancementRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn same_origin_replacement_is_silent() {
        let mut registry = EnhancementRegistry::new();
        assert!(registry.register("Foo.mod", text("A", "1")).is_none());
        assert!(registry.register("Foo.mod", text("A", "2")).is_none());

        assert_eq!(registry.len(), 1);
        let names = registry.names_from("Foo.mod.TextProvider").unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(registry.get("A").unwrap().expand("").bindings["A"], "2");
    }

    #[test]
    fn cross_origin_collision_evicts_previous() {
        let mut registry = EnhancementRegistry::new();
        registry.register("Foo.mod", text("A", "foo"));
        registry.register("Foo.mod", text("B", "foo"));

        let collision = registry.register("Bar.mod", text("A", "bar")).unwrap();
        assert_eq!(collision.variable, "A");
        assert_eq!(collision.previous_origin, "Foo.mod.TextProvider");
        assert_eq!(collision.origin, "Bar.mod.TextProvider");

        assert_eq!(registry.origin_of("A"), Some("Bar.mod.TextProvider"));
        let foo: Vec<&String> = registry
            .names_from("Foo.mod.TextProvider")
            .unwrap()
            .iter()
            .collect();
        assert_eq!(foo, vec!["B"]);
    }

    #[test]
    fn collision_removes_emptied_origin() {
        let mut registry = EnhancementRegistry::new();
        registry.register("Foo.mod", text("A", "foo"));
        registry.register("Bar.mod", text("A", "bar"));
        assert!(registry.names_from("Foo.mod.TextProvider").is_none());
        assert_eq!(registry.origins().collect::<Vec<_>>(), vec!["Bar.mod.TextProvider"]);
    }

    #[test]
    fn evict_by_prefix() {
        let mut registry = EnhancementRegistry::new();
        registry.register("Foo.a", text("A", ""));
        registry.register("Foo.b", text("B", ""));
        registry.register("Bar.a", text("C", ""));

        assert_eq!(registry.evict("Foo."), 2);
        let expected: BTreeSet<String> = ["C".to_string()].into();
        assert_eq!(registry.served_names(), expected);
        assert_eq!(registry.evict("Foo."), 0);
    }

    #[test]
    fn evict_package_compares_whole_names() {
        let loader = StaticLoader::new()
            .with("Foo", "plugin", texts(&[("A", "a")]))
            .with("Foo.Extras", "plugin", texts(&[("B", "b")]));
        let mut registry = EnhancementRegistry::new().with_loader(Box::new(loader));
        let catalog = MemoryCatalog::new();
        registry.rescan(None, &catalog);

        assert_eq!(registry.evict_package("Foo"), 1);
        assert_eq!(registry.origin_of("B"), Some("Foo.Extras.plugin.TextProvider"));
        assert!(registry.get("A").is_none());

        let report = registry.rescan_package("Foo", &catalog);
        assert_eq!(report.loaded, vec![ProviderSource::new("Foo", "plugin")]);
        assert_eq!(registry.source_generation("Foo.plugin"), 2);
        assert_eq!(registry.source_generation("Foo.Extras.plugin"), 1);
    }

    #[test]
    fn providers_for_preserves_order_and_skips_unknown() {
        let mut registry = EnhancementRegistry::new();
        registry.register("P.m", text("A", ""));
        registry.register("P.m", text("B", ""));

        let found: Vec<&str> = registry
            .providers_for(["B", "missing", "A"])
            .iter()
            .map(|p| p.variable_name())
            .collect();
        assert_eq!(found, vec!["B", "A"]);
    }

    #[test]
    fn full_rescan_replaces_everything() {
        let loader = StaticLoader::new()
            .with("Foo", "plugin", texts(&[("A", "a"), ("B", "b")]))
            .with("Bar", "plugin", texts(&[("C", "c")]));
        let mut registry = EnhancementRegistry::new().with_loader(Box::new(loader));
        registry.register("Stale.mod", text("OLD", ""));

        let report = registry.rescan(None, &MemoryCatalog::new());
        assert_eq!(report.registered, 3);
        assert!(report.failures.is_empty());
        let expected: BTreeSet<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        assert_eq!(registry.served_names(), expected);
    }

    #[test]
    fn filtered_rescan_touches_only_matching_sources() {
        let loader = StaticLoader::new()
            .with("Foo", "plugin", texts(&[("A", "a")]))
            .with("Bar", "plugin", texts(&[("C", "c")]));
        let mut registry = EnhancementRegistry::new().with_loader(Box::new(loader));
        let catalog = MemoryCatalog::new();
        registry.rescan(None, &catalog);
        assert_eq!(registry.source_generation("Foo.plugin"), 1);
        assert_eq!(registry.source_generation("Bar.plugin"), 1);

        let report = registry.rescan(Some("Foo."), &catalog);
        assert_eq!(report.loaded, vec![ProviderSource::new("Foo", "plugin")]);
        assert_eq!(registry.source_generation("Foo.plugin"), 2);
        assert_eq!(registry.source_generation("Bar.plugin"), 1);
        assert_eq!(registry.generation_of("A"), Some(2));
        assert_eq!(registry.generation_of("C"), Some(1));
    }

    #[test]
    fn failing_source_does_not_abort_discovery() {
        let loader = StaticLoader::new()
            .with("Broken", "plugin", || {
                Err(SnippetError::ProviderLoad {
                    source_id: "Broken.plugin".into(),
                    message: "syntax error".into(),
                })
            })
            .with("Good", "plugin", texts(&[("G", "g")]));
        let mut registry = EnhancementRegistry::new().with_loader(Box::new(loader));

        let report = registry.rescan(None, &MemoryCatalog::new());
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].to_string().contains("syntax error"));
        assert!(registry.get("G").is_some());
    }

    #[test]
    fn later_loaders_override_earlier_ones() {
        let first = StaticLoader::new().with("Base", "m", texts(&[("X", "base")]));
        let second = StaticLoader::new().with("Pkg", "m", texts(&[("X", "pkg")]));
        let mut registry = EnhancementRegistry::new()
            .with_loader(Box::new(first))
            .with_loader(Box::new(second));

        let report = registry.rescan(None, &MemoryCatalog::new());
        assert_eq!(report.collisions.len(), 1);
        assert_eq!(registry.get("X").unwrap().expand("").bindings["X"], "pkg");
    }
}
