//! Applicability of snippets: scope selectors and filename globs.
//!
//! A snippet applies at a cursor context when its scope selector matches
//! the scope at every probed location and its glob matches the file name.
//! Empty selectors and globs match everywhere.

use globset::Glob;

/// Where a snippet is being offered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicabilityContext {
    /// Full scope name at each probed location
    /// (e.g. `source.python meta.function.python`).
    pub scopes: Vec<String>,
    /// Name or path of the file being edited, if any.
    pub filename: Option<String>,
}

impl ApplicabilityContext {
    /// A context with a single probed location.
    pub fn at(scope: impl Into<String>) -> Self {
        Self {
            scopes: vec![scope.into()],
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Host-provided selector matching.
pub trait ScopeMatcher {
    /// Whether `selector` matches the scope name `scope`.
    fn matches(&self, selector: &str, scope: &str) -> bool;
}

/// Default selector matcher.
///
/// Supports comma-separated alternatives, ` - ` exclusions, and descendant
/// paths: every space-separated atom must prefix-match (on dot boundaries)
/// a scope entry, in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorMatcher;

impl ScopeMatcher for SelectorMatcher {
    fn matches(&self, selector: &str, scope: &str) -> bool {
        if selector.trim().is_empty() {
            return true;
        }
        let entries: Vec<&str> = scope.split_whitespace().collect();

        selector.split(',').any(|alternative| {
            let mut parts = alternative.split(" - ");
            let include = parts.next().unwrap_or("");
            path_matches(include, &entries) && parts.all(|exclude| !path_matches(exclude, &entries))
        })
    }
}

fn path_matches(path: &str, entries: &[&str]) -> bool {
    let atoms: Vec<&str> = path.split_whitespace().collect();
    if atoms.is_empty() {
        return false;
    }

    let mut remaining = entries.iter();
    atoms
        .iter()
        .all(|atom| remaining.any(|entry| atom_matches(atom, entry)))
}

fn atom_matches(atom: &str, entry: &str) -> bool {
    entry == atom
        || entry
            .strip_prefix(atom)
            .is_some_and(|rest| rest.starts_with('.'))
}

/// Whether `glob` matches `filename`.
///
/// Patterns without a `/` are matched against the base name only.
pub fn glob_matches(glob: &str, filename: &str) -> bool {
    if glob.is_empty() {
        return true;
    }

    let matcher = match Glob::new(glob) {
        Ok(g) => g.compile_matcher(),
        Err(e) => {
            tracing::warn!("Invalid snippet glob '{}': {}", glob, e);
            return false;
        }
    };

    if glob.contains('/') {
        matcher.is_match(filename)
    } else {
        let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
        matcher.is_match(base)
    }
}

/// Whether a snippet with `scope` and `glob` applies in `context`.
pub fn applies(
    matcher: &dyn ScopeMatcher,
    scope: &str,
    glob: &str,
    context: &ApplicabilityContext,
) -> bool {
    let scope_ok = scope.is_empty() || context.scopes.iter().all(|s| matcher.matches(scope, s));
    let glob_ok = glob.is_empty()
        || context
            .filename
            .as_deref()
            .is_some_and(|f| glob_matches(glob, f));
    scope_ok && glob_ok
}
