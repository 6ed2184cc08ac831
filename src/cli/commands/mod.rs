//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands build
//! a fresh [`EnhancedSnippets`](crate::context::EnhancedSnippets) through
//! a [`Workspace`] and run a full discovery before doing their work.

pub mod dispatcher;
pub mod expand;
pub mod list;
pub mod providers;
pub mod scan;
pub mod workspace;

pub use dispatcher::{Command, CommandDispatcher, CommandResult, EXIT_MISUSE};
pub use workspace::Workspace;
