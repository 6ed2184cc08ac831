//! Provider discovery.
//!
//! A [`ProviderLoader`] advertises provider sources and turns one source
//! into a list of providers. Two loaders ship with the crate:
//!
//! - [`ManifestLoader`] finds packages carrying a marker resource and reads
//!   the YAML module the marker names.
//! - [`StaticLoader`] is an in-process registration table of factories.

use anyhow::Context;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

use super::builtin::{DateProvider, DateSource, EnvProvider, TextProvider};
use super::provider::EnhancementProvider;
use crate::catalog::{ResourceCatalog, RESOURCE_ROOT};
use crate::error::{Result, SnippetError};
use crate::snippet::package_of;

use std::rc::Rc;

/// Boxed providers produced by one source.
pub type Providers = Vec<Box<dyn EnhancementProvider>>;

/// One place providers are loaded from: a module inside a package.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProviderSource {
    pub package: String,
    pub module: String,
}

impl ProviderSource {
    pub fn new(package: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            module: module.into(),
        }
    }

    /// `package.module`; the prefix of every origin this source produces.
    pub fn id(&self) -> String {
        format!("{}.{}", self.package, self.module)
    }
}

/// Discovers and loads provider sources.
pub trait ProviderLoader {
    /// Every source currently advertising providers.
    fn sources(&self, catalog: &dyn ResourceCatalog) -> Vec<ProviderSource>;

    /// Load the providers declared by `source`.
    ///
    /// `reload` is set when the source was loaded before; loaders holding a
    /// cached copy must discard it and read the source again.
    fn load(
        &mut self,
        source: &ProviderSource,
        catalog: &dyn ResourceCatalog,
        reload: bool,
    ) -> Result<Providers>;
}

type Factory = Box<dyn Fn() -> Result<Providers>>;

/// Explicit plugin registration: factories keyed by source.
#[derive(Default)]
pub struct StaticLoader {
    factories: BTreeMap<ProviderSource, Factory>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the factory for `package.module`.
    pub fn register<F>(&mut self, package: &str, module: &str, factory: F)
    where
        F: Fn() -> Result<Providers> + 'static,
    {
        self.factories
            .insert(ProviderSource::new(package, module), Box::new(factory));
    }

    /// Builder form of [`StaticLoader::register`].
    pub fn with<F>(mut self, package: &str, module: &str, factory: F) -> Self
    where
        F: Fn() -> Result<Providers> + 'static,
    {
        self.register(package, module, factory);
        self
    }

    pub fn unregister(&mut self, package: &str, module: &str) -> bool {
        self.factories
            .remove(&ProviderSource::new(package, module))
            .is_some()
    }
}

impl ProviderLoader for StaticLoader {
    fn sources(&self, _catalog: &dyn ResourceCatalog) -> Vec<ProviderSource> {
        self.factories.keys().cloned().collect()
    }

    fn load(
        &mut self,
        source: &ProviderSource,
        _catalog: &dyn ResourceCatalog,
        _reload: bool,
    ) -> Result<Providers> {
        let factory = self
            .factories
            .get(source)
            .ok_or_else(|| SnippetError::ProviderLoad {
                source_id: source.id(),
                message: "no factory registered".to_string(),
            })?;
        factory()
    }
}

/// A provider declared in a YAML module.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum ProviderDecl {
    /// The current date under a custom variable name.
    Date {
        variable: String,
        #[serde(default)]
        format: Option<String>,
    },
    /// A fixed string.
    Text { variable: String, value: String },
    /// The value of an environment variable.
    Env { variable: String, name: String },
}

/// Parsed contents of a provider module file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ProviderModule {
    #[serde(default)]
    pub providers: Vec<ProviderDecl>,
}

/// Loads providers declared by package marker files.
///
/// A package advertises providers by shipping a marker resource at its
/// root. The marker's first line, when non-blank, names the module file
/// (`<module>.yml`, next to the marker) holding the declarations.
pub struct ManifestLoader {
    marker_file: String,
    default_module: String,
    default_date_format: String,
    dates: Rc<dyn DateSource>,
    cache: HashMap<ProviderSource, ProviderModule>,
}

impl ManifestLoader {
    pub fn new(
        marker_file: impl Into<String>,
        default_module: impl Into<String>,
        default_date_format: impl Into<String>,
        dates: Rc<dyn DateSource>,
    ) -> Self {
        Self {
            marker_file: marker_file.into(),
            default_module: default_module.into(),
            default_date_format: default_date_format.into(),
            dates,
            cache: HashMap::new(),
        }
    }

    fn is_marker(&self, resource: &str) -> bool {
        let mut parts = resource.splitn(3, '/');
        parts.next() == Some(RESOURCE_ROOT)
            && parts.next().is_some_and(|p| !p.is_empty())
            && parts.next() == Some(self.marker_file.as_str())
    }

    fn module_name(&self, catalog: &dyn ResourceCatalog, marker: &str) -> String {
        let declared = catalog.load(marker).ok().and_then(|bytes| {
            String::from_utf8_lossy(&bytes)
                .lines()
                .next()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty())
        });
        declared.unwrap_or_else(|| self.default_module.clone())
    }

    fn read_module(
        &self,
        source: &ProviderSource,
        catalog: &dyn ResourceCatalog,
    ) -> Result<ProviderModule> {
        let resource = format!("{}/{}/{}.yml", RESOURCE_ROOT, source.package, source.module);
        parse_module(catalog, &resource).map_err(|e| SnippetError::ProviderLoad {
            source_id: source.id(),
            message: format!("{:#}", e),
        })
    }

    fn instantiate(&self, decl: &ProviderDecl) -> Box<dyn EnhancementProvider> {
        match decl {
            ProviderDecl::Date { variable, format } => Box::new(DateProvider::new(
                variable.clone(),
                format.clone().unwrap_or_else(|| self.default_date_format.clone()),
                Rc::clone(&self.dates),
            )),
            ProviderDecl::Text { variable, value } => {
                Box::new(TextProvider::new(variable.clone(), value.clone()))
            }
            ProviderDecl::Env { variable, name } => {
                Box::new(EnvProvider::new(variable.clone(), name.clone()))
            }
        }
    }
}

impl ProviderLoader for ManifestLoader {
    fn sources(&self, catalog: &dyn ResourceCatalog) -> Vec<ProviderSource> {
        let mut sources: Vec<ProviderSource> = catalog
            .list()
            .into_iter()
            .filter(|r| self.is_marker(r))
            .map(|marker| {
                ProviderSource::new(package_of(&marker), self.module_name(catalog, &marker))
            })
            .collect();
        sources.sort();
        sources
    }

    fn load(
        &mut self,
        source: &ProviderSource,
        catalog: &dyn ResourceCatalog,
        reload: bool,
    ) -> Result<Providers> {
        if reload {
            self.cache.remove(source);
        }
        if !self.cache.contains_key(source) {
            let module = self.read_module(source, catalog)?;
            self.cache.insert(source.clone(), module);
        }

        let module = &self.cache[source];
        Ok(module.providers.iter().map(|d| self.instantiate(d)).collect())
    }
}

/// Read and decode one provider module resource.
fn parse_module(catalog: &dyn ResourceCatalog, resource: &str) -> anyhow::Result<ProviderModule> {
    let bytes = catalog.load(resource)?;
    let text = String::from_utf8(bytes).with_context(|| format!("{} is not UTF-8", resource))?;
    if text.trim().is_empty() {
        return Ok(ProviderModule::default());
    }
    serde_yaml::from_str(&text).with_context(|| format!("Failed to parse {}", resource))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::enhancement::builtin::FixedDate;

    fn loader() -> ManifestLoader {
        ManifestLoader::new(
            ".enhanced-snippets",
            "enhancements",
            "%Y-%m-%d",
            Rc::new(FixedDate::ymd(2024, 1, 1)),
        )
    }

    #[test]
    fn marker_first_line_names_module() {
        let catalog = MemoryCatalog::new()
            .with("Packages/Foo/.enhanced-snippets", "custom\n")
            .with("Packages/Bar/.enhanced-snippets", "")
            .with("Packages/Baz/nested/.enhanced-snippets", "ignored");

        let sources = loader().sources(&catalog);
        assert_eq!(
            sources,
            vec![
                ProviderSource::new("Bar", "enhancements"),
                ProviderSource::new("Foo", "custom"),
            ]
        );
    }

    #[test]
    fn module_declarations_become_providers() {
        let catalog = MemoryCatalog::new()
            .with("Packages/Foo/.enhanced-snippets", "")
            .with(
                "Packages/Foo/enhancements.yml",
                "providers:\n  - type: text\n    variable: COMPANY\n    value: Acme\n  - type: date\n    variable: TODAY\n",
            );

        let mut loader = loader();
        let source = ProviderSource::new("Foo", "enhancements");
        let providers = loader.load(&source, &catalog, false).unwrap();
        let names: Vec<&str> = providers.iter().map(|p| p.variable_name()).collect();
        assert_eq!(names, vec!["COMPANY", "TODAY"]);
        assert_eq!(
            providers[1].expand("${TODAY}").bindings["TODAY"],
            "2024-01-01"
        );
    }

    #[test]
    fn missing_module_is_a_load_error() {
        let catalog = MemoryCatalog::new().with("Packages/Foo/.enhanced-snippets", "");
        let err = loader()
            .load(&ProviderSource::new("Foo", "enhancements"), &catalog, false)
            .err()
            .unwrap();
        assert!(matches!(err, SnippetError::ProviderLoad { .. }));
        assert!(err.to_string().contains("Foo.enhancements"));
    }

    #[test]
    fn unknown_provider_type_is_a_load_error() {
        let catalog = MemoryCatalog::new().with(
            "Packages/Foo/enhancements.yml",
            "providers:\n  - type: magic\n    variable: X\n",
        );
        let err = loader()
            .load(&ProviderSource::new("Foo", "enhancements"), &catalog, false)
            .err()
            .unwrap();
        assert!(matches!(err, SnippetError::ProviderLoad { .. }));
        assert!(err
            .to_string()
            .contains("Failed to parse Packages/Foo/enhancements.yml"));
    }

    #[test]
    fn reload_rereads_the_module() {
        let source = ProviderSource::new("Foo", "enhancements");
        let mut catalog = MemoryCatalog::new().with(
            "Packages/Foo/enhancements.yml",
            "providers:\n  - type: text\n    variable: A\n    value: one\n",
        );
        let mut loader = loader();
        assert_eq!(loader.load(&source, &catalog, false).unwrap().len(), 1);

        catalog.insert("Packages/Foo/enhancements.yml", "providers: []\n");
        assert_eq!(loader.load(&source, &catalog, false).unwrap().len(), 1);
        assert_eq!(loader.load(&source, &catalog, true).unwrap().len(), 0);
    }

    #[test]
    fn static_loader_calls_factories() {
        let mut loader = StaticLoader::new().with("Pkg", "plugin", || {
            Ok(vec![Box::new(TextProvider::new("X", "x")) as Box<dyn EnhancementProvider>])
        });
        let catalog = MemoryCatalog::new();
        let sources = loader.sources(&catalog);
        assert_eq!(sources, vec![ProviderSource::new("Pkg", "plugin")]);
        assert_eq!(loader.load(&sources[0], &catalog, false).unwrap().len(), 1);

        assert!(loader.unregister("Pkg", "plugin"));
        assert!(loader.load(&sources[0], &catalog, false).is_err());
    }
}
