//! The command-palette listing artifact.
//!
//! One entry per indexed snippet: a caption (the snippet title) and the
//! command invocation that inserts it by resource id. Writes are debounced
//! so a burst of registry changes regenerates the file once.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::registry::SnippetIndex;
use crate::schedule::Debouncer;

/// Command name hosts bind to `insert`.
pub const INSERT_COMMAND: &str = "insert_enhanced_snippet";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingArgs {
    pub name: String,
}

/// One listing line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub caption: String,
    pub command: String,
    pub args: ListingArgs,
}

/// Entries for every snippet in `index`, sorted by caption then resource.
pub fn build_listing(index: &SnippetIndex) -> Vec<ListingEntry> {
    let mut entries: Vec<ListingEntry> = index
        .iter()
        .map(|s| ListingEntry {
            caption: format!("Snippet: {}", s.title()),
            command: INSERT_COMMAND.to_string(),
            args: ListingArgs {
                name: s.resource().to_string(),
            },
        })
        .collect();
    entries.sort_by(|a, b| (&a.caption, &a.args.name).cmp(&(&b.caption, &b.args.name)));
    entries
}

/// Listing as pretty JSON.
pub fn render_listing(index: &SnippetIndex) -> Result<String> {
    Ok(serde_json::to_string_pretty(&build_listing(index))?)
}

/// Write the listing to `path`, creating parent directories.
pub fn write_listing(index: &SnippetIndex, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_listing(index)?)?;
    tracing::debug!("Wrote {} listing entries to {}", index.len(), path.display());
    Ok(())
}

/// Debounced listing regeneration.
#[derive(Debug, Clone)]
pub struct ListingWriter {
    path: Option<PathBuf>,
    debouncer: Debouncer,
    seen: u64,
}

impl ListingWriter {
    /// A writer targeting `path`; with no path nothing is ever written.
    pub fn new(path: Option<PathBuf>, delay: Duration) -> Self {
        Self {
            path,
            debouncer: Debouncer::new(delay),
            seen: 0,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Schedule a write for every registry mutation not yet seen.
    pub fn observe(&mut self, mutation_count: u64, now: Instant) {
        if self.path.is_none() {
            self.seen = mutation_count;
            return;
        }
        while self.seen < mutation_count {
            self.seen += 1;
            self.debouncer.trigger(now);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    /// Write the listing if the pending writes have settled.
    ///
    /// Returns whether a file was written.
    pub fn poll(&mut self, now: Instant, index: &SnippetIndex) -> Result<bool> {
        if !self.debouncer.poll(now) {
            return Ok(false);
        }
        match &self.path {
            Some(path) => {
                write_listing(index, path)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
