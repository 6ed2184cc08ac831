//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Computed variables and multi-choice fields for editor snippets.
#[derive(Debug, Parser)]
#[command(name = "enhanced-snippets")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to settings file (overrides enhanced-snippets.yml under the root)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the settings file and the packages tree
    #[arg(short, long, global = true, env = "ENHANCED_SNIPPETS_ROOT")]
    pub root: Option<PathBuf>,

    /// Show per-resource detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Discover providers and index enhanced snippets
    Scan(ScanArgs),

    /// Show the snippet listing, or the snippets that apply at a scope
    List(ListArgs),

    /// Expand one snippet and print its final arguments
    Expand(ExpandArgs),

    /// Show registered enhancement providers
    Providers(ProvidersArgs),
}

/// Arguments for the `scan` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ScanArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Exit non-zero when any resource or provider failed to load
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Only snippets applicable at this scope
    #[arg(long)]
    pub scope: Option<String>,

    /// File name to match snippet globs against (with --scope)
    #[arg(long, requires = "scope")]
    pub file: Option<String>,

    /// Write the command listing to this path
    #[arg(long, value_name = "PATH")]
    pub write: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `expand` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ExpandArgs {
    /// Resource id of the snippet (e.g. Packages/User/date.sublime-snippet)
    #[arg(long)]
    pub name: Option<String>,

    /// Inline snippet text
    #[arg(long)]
    pub contents: Option<String>,

    /// Scope for inline contents
    #[arg(long, default_value = "")]
    pub scope: String,

    /// Glob for inline contents
    #[arg(long, default_value = "")]
    pub glob: String,

    /// Extra binding as NAME=VALUE (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// Clipboard text for ${CLIPBOARD}
    #[arg(long)]
    pub clipboard: Option<String>,

    /// Prompt for every field that offers choices
    #[arg(long)]
    pub pick: bool,

    /// Seed for BUZZWORD text
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for the `providers` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ProvidersArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
