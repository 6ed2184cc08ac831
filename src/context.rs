//! The owned application context.
//!
//! [`EnhancedSnippets`] is created once with its settings and host
//! collaborators and owns both registries, the per-document field
//! navigators, the ignored-package watcher and the listing writer. Every
//! command the host exposes is a method here.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::catalog::{IgnoringCatalog, ResourceCatalog, RESOURCE_ROOT};
use crate::config::Settings;
use crate::enhancement::{
    BuiltinLoader, Clipboard, DateSource, EnhancementRegistry, ManifestLoader, MemoryClipboard,
    ProviderLoader, RescanReport, SystemDate,
};
use crate::error::{Result, SnippetError};
use crate::expansion::{ExpansionPipeline, FinalArgs};
use crate::listing::ListingWriter;
use crate::navigator::{ChoiceRequest, FieldNavigator, Picker, TextInserter};
use crate::registry::{load_snippet, ReloadOutcome, ScanReport, SnippetRegistry};
use crate::schedule::{Clock, SystemClock};
use crate::scope::{ApplicabilityContext, ScopeMatcher, SelectorMatcher};
use crate::snippet::{package_of, parse, Snippet, SnippetParts};
use crate::watcher::{PackageChange, PackageChangeWatcher};

/// Identifies an open document.
pub type DocumentId = u64;

/// Resource id given to snippets built from inline contents.
pub const INLINE_RESOURCE: &str = "<inline>";

/// Completion detail text for enhanced snippets.
pub const COMPLETION_DETAILS: &str = "Enhanced snippet";

/// Host collaborators.
pub struct Host {
    pub catalog: Box<dyn ResourceCatalog>,
    pub matcher: Box<dyn ScopeMatcher>,
    pub clock: Box<dyn Clock>,
    pub dates: Rc<dyn DateSource>,
    pub clipboard: Rc<dyn Clipboard>,
    pub buzzword_seed: Option<u64>,
}

impl Host {
    /// Real clocks, the default selector matcher and an empty clipboard.
    pub fn new(catalog: impl ResourceCatalog + 'static) -> Self {
        Self {
            catalog: Box::new(catalog),
            matcher: Box::new(SelectorMatcher),
            clock: Box::new(SystemClock),
            dates: Rc::new(SystemDate),
            clipboard: Rc::new(MemoryClipboard::default()),
            buzzword_seed: None,
        }
    }

    pub fn with_matcher(mut self, matcher: impl ScopeMatcher + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_dates(mut self, dates: Rc<dyn DateSource>) -> Self {
        self.dates = dates;
        self
    }

    pub fn with_clipboard(mut self, clipboard: Rc<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_buzzword_seed(mut self, seed: u64) -> Self {
        self.buzzword_seed = Some(seed);
        self
    }
}

/// Which snippet `insert` should expand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertRequest {
    /// Resource id of an indexed (or loadable) snippet.
    pub name: Option<String>,
    /// Inline snippet text.
    pub contents: Option<String>,
    /// Scope for inline contents.
    pub scope: String,
    /// Glob for inline contents.
    pub glob: String,
}

impl InsertRequest {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn inline(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
            ..Default::default()
        }
    }
}

/// An auto-complete entry for one enhanced snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionItem {
    pub trigger: String,
    pub annotation: String,
    pub details: String,
    pub args: FinalArgs,
}

/// What a save notification led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The file is not a resource this crate cares about.
    Ignored,
    /// A snippet resource was reloaded.
    Snippet(ReloadOutcome),
    /// A provider marker or module changed; providers were reloaded.
    Providers { rescanned_snippets: bool },
}

/// Work done by one [`EnhancedSnippets::tick`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub package_changes: Vec<(String, PackageChange)>,
    pub listing_written: bool,
}

/// The snippet enhancement system.
pub struct EnhancedSnippets {
    settings: Settings,
    catalog: Box<dyn ResourceCatalog>,
    matcher: Box<dyn ScopeMatcher>,
    clock: Box<dyn Clock>,
    enhancements: EnhancementRegistry,
    snippets: SnippetRegistry,
    navigators: HashMap<DocumentId, FieldNavigator>,
    watcher: PackageChangeWatcher,
    listing: ListingWriter,
}

impl EnhancedSnippets {
    /// Build the context. No discovery happens until
    /// [`EnhancedSnippets::refresh`] (or one of the narrower refreshes).
    pub fn new(settings: Settings, host: Host) -> Self {
        let mut options = settings.builtin_options();
        options.buzzword_seed = host.buzzword_seed;

        let enhancements = EnhancementRegistry::new()
            .with_loader(Box::new(BuiltinLoader::new(
                options,
                Rc::clone(&host.dates),
                Rc::clone(&host.clipboard),
            )))
            .with_loader(Box::new(ManifestLoader::new(
                settings.marker_file.clone(),
                settings.default_provider_module.clone(),
                settings.date_format.clone(),
                Rc::clone(&host.dates),
            )));

        Self {
            snippets: SnippetRegistry::new(settings.snippet_extensions.clone()),
            watcher: PackageChangeWatcher::new(
                settings.ignored_packages.clone(),
                Duration::from_millis(settings.rescan_delay_ms),
            ),
            listing: ListingWriter::new(
                settings.listing_path.clone(),
                Duration::from_millis(settings.listing_delay_ms),
            ),
            navigators: HashMap::new(),
            enhancements,
            catalog: host.catalog,
            matcher: host.matcher,
            clock: host.clock,
            settings,
        }
    }

    /// Add a provider loader consulted after the built-in and manifest ones.
    pub fn add_loader(&mut self, loader: Box<dyn ProviderLoader>) {
        self.enhancements.add_loader(loader);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn enhancements(&self) -> &EnhancementRegistry {
        &self.enhancements
    }

    pub fn snippets(&self) -> &SnippetRegistry {
        &self.snippets
    }

    pub fn navigator(&self, doc: DocumentId) -> Option<&FieldNavigator> {
        self.navigators.get(&doc)
    }

    /// The currently ignored packages.
    pub fn ignored_packages(&self) -> &BTreeSet<String> {
        self.watcher.ignored()
    }

    /// Load providers, then snippets.
    ///
    /// Pending ignored-package changes are dropped: the full pass already
    /// sees the current ignored set.
    pub fn refresh(&mut self) -> (RescanReport, ScanReport) {
        let superseded = self.watcher.flush();
        if !superseded.is_empty() {
            tracing::debug!("Full refresh supersedes {} package changes", superseded.len());
        }
        let providers = self.rescan_providers();
        let snippets = self.refresh_snippets();
        (providers, snippets)
    }

    /// Full snippet rescan.
    pub fn refresh_snippets(&mut self) -> ScanReport {
        let served = self.enhancements.served_names();
        let view = IgnoringCatalog::new(self.catalog.as_ref(), self.watcher.ignored());
        let report = self.snippets.scan(&view, &served);
        self.note_mutations();
        report
    }

    /// Full provider rediscovery. Snippets are rescanned too when the set
    /// of served variables changed.
    pub fn refresh_enhancements(&mut self) -> RescanReport {
        let before = self.enhancements.served_names();
        let report = self.rescan_providers();
        if self.enhancements.served_names() != before {
            self.refresh_snippets();
        }
        report
    }

    fn rescan_providers(&mut self) -> RescanReport {
        let view = IgnoringCatalog::new(self.catalog.as_ref(), self.watcher.ignored());
        self.enhancements.rescan(None, &view)
    }

    fn rescan_package_providers(&mut self, package: &str) -> RescanReport {
        let view = IgnoringCatalog::new(self.catalog.as_ref(), self.watcher.ignored());
        self.enhancements.rescan_package(package, &view)
    }

    /// Resolve and expand a snippet, starting field tracking for `doc`.
    ///
    /// # Errors
    ///
    /// `InvalidArguments` unless exactly one of `name` and `contents` is
    /// given, `LookupMiss` when `name` resolves to nothing, and
    /// `Validation` when inline contents are a malformed snippet.
    pub fn insert(
        &mut self,
        doc: DocumentId,
        request: &InsertRequest,
        extra: &BTreeMap<String, String>,
        inserter: &mut dyn TextInserter,
    ) -> Result<FinalArgs> {
        let snippet = self.resolve(request)?;
        let args = ExpansionPipeline::new(&self.enhancements).expand(&snippet, extra);

        let navigator = self.navigators.entry(doc).or_default();
        navigator.clear(inserter);
        if snippet.has_fields() {
            navigator.begin_snippet(&snippet, inserter);
        }
        Ok(args)
    }

    /// The snippet an insert request refers to.
    pub fn resolve(&self, request: &InsertRequest) -> Result<Arc<Snippet>> {
        match (&request.name, &request.contents) {
            (Some(name), None) => self.resolve_name(name),
            (None, Some(contents)) => Ok(Arc::new(inline_snippet(contents, request)?)),
            _ => Err(SnippetError::InvalidArguments {
                message: "insert needs exactly one of 'name' or 'contents'".to_string(),
            }),
        }
    }

    fn resolve_name(&self, name: &str) -> Result<Arc<Snippet>> {
        if let Some(snippet) = self.snippets.lookup(name) {
            return Ok(snippet);
        }
        if self.snippets.is_snippet_resource(name) {
            let view = IgnoringCatalog::new(self.catalog.as_ref(), self.watcher.ignored());
            match load_snippet(&view, name) {
                Ok(snippet) => return Ok(Arc::new(snippet)),
                Err(e) => tracing::debug!("Direct load of {} failed: {}", name, e),
            }
        }
        tracing::warn!("Unable to find or load snippet '{}'", name);
        Err(SnippetError::LookupMiss {
            name: name.to_string(),
        })
    }

    /// Move the active field of `doc` by `step`.
    pub fn field_move(
        &mut self,
        doc: DocumentId,
        step: isize,
        picker: &mut dyn Picker,
        inserter: &mut dyn TextInserter,
    ) -> Result<bool> {
        match self.navigators.get_mut(&doc) {
            Some(navigator) => navigator.move_by(step, picker, inserter),
            None => Ok(false),
        }
    }

    /// Prompt for `request` in `doc` and apply the choice.
    pub fn pick_option(
        &mut self,
        doc: DocumentId,
        request: &ChoiceRequest,
        picker: &mut dyn Picker,
        inserter: &mut dyn TextInserter,
    ) -> Result<bool> {
        self.navigators
            .entry(doc)
            .or_default()
            .prompt(request, picker, inserter)
    }

    /// Abandon field tracking for `doc`.
    pub fn clear_fields(&mut self, doc: DocumentId, inserter: &mut dyn TextInserter) {
        if let Some(navigator) = self.navigators.get_mut(&doc) {
            navigator.clear(inserter);
        }
    }

    /// Forget everything about a closed document.
    pub fn close_document(&mut self, doc: DocumentId, inserter: &mut dyn TextInserter) {
        if let Some(mut navigator) = self.navigators.remove(&doc) {
            navigator.clear(inserter);
        }
    }

    /// Indexed snippets that apply in `context`.
    pub fn applicable(&self, context: &ApplicabilityContext) -> Vec<Arc<Snippet>> {
        self.snippets.matches(context, self.matcher.as_ref())
    }

    /// Completion items for the snippets that apply in `context`.
    pub fn completions(&self, context: &ApplicabilityContext) -> Vec<CompletionItem> {
        if !self.settings.auto_complete_include_snippets {
            return Vec::new();
        }
        let pipeline = ExpansionPipeline::new(&self.enhancements);
        self.applicable(context)
            .into_iter()
            .filter(|s| !s.trigger().is_empty())
            .map(|s| CompletionItem {
                trigger: s.trigger().to_string(),
                annotation: s.description().to_string(),
                details: COMPLETION_DETAILS.to_string(),
                args: pipeline.expand(&s, &BTreeMap::new()),
            })
            .collect()
    }

    /// React to a saved file.
    pub fn on_post_save(&mut self, path: &Path) -> SaveOutcome {
        let resource = {
            let view = IgnoringCatalog::new(self.catalog.as_ref(), self.watcher.ignored());
            view.resource_for_path(path)
        };
        let Some(resource) = resource else {
            return SaveOutcome::Ignored;
        };

        if self.snippets.is_snippet_resource(&resource) {
            let served = self.enhancements.served_names();
            let view = IgnoringCatalog::new(self.catalog.as_ref(), self.watcher.ignored());
            let outcome = self.snippets.reload_resource(&resource, &view, &served);
            self.note_mutations();
            return SaveOutcome::Snippet(outcome);
        }

        if self.is_provider_resource(&resource) {
            let package = package_of(&resource).to_string();
            let before = self.enhancements.served_names();
            self.rescan_package_providers(&package);
            let changed = self.enhancements.served_names() != before;
            if changed {
                self.refresh_snippets();
            }
            return SaveOutcome::Providers {
                rescanned_snippets: changed,
            };
        }

        SaveOutcome::Ignored
    }

    fn is_provider_resource(&self, resource: &str) -> bool {
        let package = package_of(resource);
        let marker = format!("{}/{}/{}", RESOURCE_ROOT, package, self.settings.marker_file);
        if resource == marker {
            return true;
        }
        let in_package_root = resource
            .strip_prefix(&format!("{}/{}/", RESOURCE_ROOT, package))
            .is_some_and(|rest| !rest.contains('/') && rest.ends_with(".yml"));
        in_package_root && self.catalog.list().iter().any(|r| *r == marker)
    }

    /// Record a new ignored-packages set. Work is deferred to [`tick`].
    ///
    /// [`tick`]: EnhancedSnippets::tick
    pub fn ignored_packages_changed(&mut self, ignored: BTreeSet<String>) {
        let now = self.clock.now();
        self.watcher.update(ignored, now);
    }

    /// When deferred work is next due, if any is pending. Hosts schedule
    /// their next [`tick`] for this instant.
    ///
    /// [`tick`]: EnhancedSnippets::tick
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.watcher.next_deadline(), self.listing.next_deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    /// Run deferred work that has come due.
    pub fn tick(&mut self) -> Result<TickReport> {
        let now = self.clock.now();
        let changes = self.watcher.poll(now);
        if !changes.is_empty() {
            self.apply_package_changes(&changes);
        }

        self.listing.observe(self.snippets.mutation_count(), now);
        let listing_written = self.listing.poll(now, &self.snippets.snapshot())?;
        Ok(TickReport {
            package_changes: changes,
            listing_written,
        })
    }

    fn apply_package_changes(&mut self, changes: &[(String, PackageChange)]) {
        let before = self.enhancements.served_names();
        for (package, change) in changes {
            match change {
                PackageChange::Ignored => {
                    self.snippets.discard_package(package);
                    self.enhancements.evict_package(package);
                }
                PackageChange::Restored => {
                    self.rescan_package_providers(package);
                    let served = self.enhancements.served_names();
                    let view = IgnoringCatalog::new(self.catalog.as_ref(), self.watcher.ignored());
                    self.snippets.scan_package(package, &view, &served);
                }
            }
        }

        if self.enhancements.served_names() != before {
            self.refresh_snippets();
        } else {
            self.note_mutations();
        }
    }

    fn note_mutations(&mut self) {
        self.listing
            .observe(self.snippets.mutation_count(), self.clock.now());
    }
}

fn inline_snippet(contents: &str, request: &InsertRequest) -> Result<Snippet> {
    let mut parts = match parse(contents.as_bytes(), INLINE_RESOURCE) {
        Ok(snippet) => return Ok(snippet),
        Err(SnippetError::Format { .. }) => SnippetParts {
            content: contents.to_string(),
            ..Default::default()
        },
        Err(e) => return Err(e),
    };
    parts.scope = request.scope.clone();
    parts.glob = request.glob.clone();
    Ok(Snippet::from_parts(parts, INLINE_RESOURCE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::enhancement::FixedDate;
    use crate::navigator::{RecordingInserter, ScriptedPicker};

    fn settings() -> Settings {
        Settings {
            date_format: "%Y-%m-%d".into(),
            ..Default::default()
        }
    }

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::new()
            .with(
                "Packages/User/greet.sublime-snippet",
                "<snippet><tabTrigger>greet</tabTrigger><description>Greeting</description>\
                 <content>Hello ${1:name}, today is ${DATE}</content><scope>source.rust</scope></snippet>",
            )
            .with(
                "Packages/User/plain.sublime-snippet",
                "<snippet><content>plain ${1:x}</content></snippet>",
            )
    }

    fn system() -> EnhancedSnippets {
        let host = Host::new(catalog()).with_dates(Rc::new(FixedDate::ymd(2024, 1, 1)));
        let mut system = EnhancedSnippets::new(settings(), host);
        system.refresh();
        system
    }

    #[test]
    fn insert_by_name_expands_and_tracks_fields() {
        let mut system = system();
        let mut inserter = RecordingInserter::new();
        let args = system
            .insert(
                1,
                &InsertRequest::by_name("Packages/User/greet.sublime-snippet"),
                &BTreeMap::new(),
                &mut inserter,
            )
            .unwrap();

        assert_eq!(args.contents, "Hello ${1:name}, today is ${DATE}");
        assert_eq!(args.bindings["DATE"], "2024-01-01");
        assert_eq!(system.navigator(1).unwrap().current_field(), Some("1"));
    }

    #[test]
    fn insert_requires_exactly_one_source() {
        let mut system = system();
        let mut inserter = RecordingInserter::new();
        let both = InsertRequest {
            name: Some("x".into()),
            contents: Some("y".into()),
            ..Default::default()
        };
        for request in [both, InsertRequest::default()] {
            let err = system
                .insert(1, &request, &BTreeMap::new(), &mut inserter)
                .unwrap_err();
            assert!(matches!(err, SnippetError::InvalidArguments { .. }));
        }
    }

    #[test]
    fn insert_falls_back_to_direct_load() {
        let mut system = system();
        let args = system
            .insert(
                1,
                &InsertRequest::by_name("Packages/User/plain.sublime-snippet"),
                &BTreeMap::new(),
                &mut RecordingInserter::new(),
            )
            .unwrap();
        assert_eq!(args.contents, "plain ${1:x}");
    }

    #[test]
    fn insert_unknown_name_is_lookup_miss() {
        let mut system = system();
        let err = system
            .insert(
                1,
                &InsertRequest::by_name("Packages/User/none.sublime-snippet"),
                &BTreeMap::new(),
                &mut RecordingInserter::new(),
            )
            .unwrap_err();
        assert!(matches!(err, SnippetError::LookupMiss { .. }));
    }

    #[test]
    fn inline_contents_without_fields_leave_navigator_idle() {
        let mut system = system();
        let args = system
            .insert(
                2,
                &InsertRequest::inline("\n  Date: ${DATE:%Y}"),
                &BTreeMap::new(),
                &mut RecordingInserter::new(),
            )
            .unwrap();
        assert_eq!(args.contents, "Date: ${DATE_1}");
        assert_eq!(args.bindings["DATE_1"], "2024");
        assert!(!system.navigator(2).unwrap().is_active());
    }

    #[test]
    fn completions_respect_scope_and_setting() {
        let system = system();
        let items = system.completions(&ApplicabilityContext::at("source.rust"));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].trigger, "greet");
        assert_eq!(items[0].annotation, "Greeting");
        assert_eq!(items[0].details, COMPLETION_DETAILS);
        assert!(system
            .completions(&ApplicabilityContext::at("text.plain"))
            .is_empty());

        let host = Host::new(catalog());
        let mut quiet = EnhancedSnippets::new(
            Settings {
                auto_complete_include_snippets: false,
                ..settings()
            },
            host,
        );
        quiet.refresh();
        assert!(quiet
            .completions(&ApplicabilityContext::at("source.rust"))
            .is_empty());
    }

    #[test]
    fn field_move_without_navigator_is_noop() {
        let mut system = system();
        let moved = system
            .field_move(9, 1, &mut ScriptedPicker::default(), &mut RecordingInserter::new())
            .unwrap();
        assert!(!moved);
    }
}
