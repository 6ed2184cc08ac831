//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::PathBuf;

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::ui::UserInterface;

use super::workspace::Workspace;

/// Exit code for a bad combination of arguments or a missing settings file.
pub const EXIT_MISUSE: i32 = 2;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    workspace: Workspace,
}

impl CommandDispatcher {
    pub fn new(root: PathBuf, config: Option<PathBuf>) -> Self {
        Self {
            workspace: Workspace::new(root, config),
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Commands::Scan(args) => {
                super::scan::ScanCommand::new(&self.workspace, args.clone()).execute(ui)
            }
            Commands::List(args) => {
                super::list::ListCommand::new(&self.workspace, args.clone()).execute(ui)
            }
            Commands::Expand(args) => {
                super::expand::ExpandCommand::new(&self.workspace, args.clone()).execute(ui)
            }
            Commands::Providers(args) => {
                super::providers::ProvidersCommand::new(&self.workspace, args.clone()).execute(ui)
            }
        }
    }
}
