//! Ignored-package tracking.
//!
//! [`PackageChangeWatcher`] caches the last known ignored-package set and
//! turns each new set into per-package changes. Changes are held for a
//! settle delay; later updates inside the window overwrite a package's
//! pending state, so one package is reported at most once per flush.

use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use crate::schedule::Debouncer;

/// What happened to a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageChange {
    /// The package became ignored; its snippets and providers must go.
    Ignored,
    /// The package is no longer ignored; it must be scanned again.
    Restored,
}

/// Debounced watcher over the ignored-packages setting.
#[derive(Debug, Clone)]
pub struct PackageChangeWatcher {
    ignored: BTreeSet<String>,
    pending: BTreeMap<String, PackageChange>,
    debouncer: Debouncer,
}

impl PackageChangeWatcher {
    pub fn new(initial: BTreeSet<String>, delay: Duration) -> Self {
        Self {
            ignored: initial,
            pending: BTreeMap::new(),
            debouncer: Debouncer::new(delay),
        }
    }

    /// The ignored set as of the last update.
    pub fn ignored(&self) -> &BTreeSet<String> {
        &self.ignored
    }

    /// Record a new ignored set. Returns `(newly ignored, restored)`.
    pub fn update(
        &mut self,
        ignored: BTreeSet<String>,
        now: Instant,
    ) -> (BTreeSet<String>, BTreeSet<String>) {
        if ignored == self.ignored {
            return Default::default();
        }

        let added: BTreeSet<String> = ignored.difference(&self.ignored).cloned().collect();
        let removed: BTreeSet<String> = self.ignored.difference(&ignored).cloned().collect();
        tracing::info!(
            "Ignored packages changed: {} added, {} removed",
            added.len(),
            removed.len()
        );

        for package in &added {
            self.pending.insert(package.clone(), PackageChange::Ignored);
        }
        for package in &removed {
            self.pending.insert(package.clone(), PackageChange::Restored);
        }
        self.ignored = ignored;
        self.debouncer.trigger(now);
        (added, removed)
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// When the pending changes are next checked.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    /// Changes that have settled by `now`, sorted by package.
    pub fn poll(&mut self, now: Instant) -> Vec<(String, PackageChange)> {
        if !self.debouncer.poll(now) {
            return Vec::new();
        }
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    /// Take every pending change immediately.
    pub fn flush(&mut self) -> Vec<(String, PackageChange)> {
        self.debouncer.cancel();
        std::mem::take(&mut self.pending).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{Clock, ManualClock};

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn update_diffs_against_cached_set() {
        let clock = ManualClock::new();
        let mut w = PackageChangeWatcher::new(set(&["A", "B"]), Duration::from_secs(1));

        let (added, removed) = w.update(set(&["B", "C"]), clock.now());
        assert_eq!(added, set(&["C"]));
        assert_eq!(removed, set(&["A"]));
        assert_eq!(w.ignored(), &set(&["B", "C"]));
    }

    #[test]
    fn unchanged_set_schedules_nothing() {
        let clock = ManualClock::new();
        let mut w = PackageChangeWatcher::new(set(&["A"]), Duration::from_secs(1));
        w.update(set(&["A"]), clock.now());
        assert!(!w.is_pending());
    }

    #[test]
    fn changes_wait_for_delay_and_coalesce() {
        let clock = ManualClock::new();
        let mut w = PackageChangeWatcher::new(set(&[]), Duration::from_millis(1000));

        w.update(set(&["A"]), clock.now());
        clock.advance_ms(500);
        w.update(set(&["B"]), clock.now());
        clock.advance_ms(600);
        assert!(w.poll(clock.now()).is_empty());

        clock.advance_ms(400);
        let changes = w.poll(clock.now());
        assert_eq!(
            changes,
            vec![
                ("A".to_string(), PackageChange::Restored),
                ("B".to_string(), PackageChange::Ignored),
            ]
        );
        assert!(w.poll(clock.now()).is_empty());
    }

    #[test]
    fn flush_returns_pending_immediately() {
        let clock = ManualClock::new();
        let mut w = PackageChangeWatcher::new(set(&[]), Duration::from_secs(5));
        w.update(set(&["A"]), clock.now());
        assert_eq!(w.flush(), vec![("A".to_string(), PackageChange::Ignored)]);
        assert!(!w.is_pending());
    }
}
