//! Providers command implementation.
//!
//! `enhanced-snippets providers` runs provider discovery and shows which
//! variable each registered provider serves and where it came from.

use serde::Serialize;

use crate::cli::args::ProvidersArgs;
use crate::error::{Result, SnippetError};
use crate::ui::theme::SnippetTheme;
use crate::ui::{should_use_colors, UserInterface};

use super::dispatcher::{Command, CommandResult, EXIT_MISUSE};
use super::workspace::Workspace;

#[derive(Debug, Serialize)]
struct ProviderEntry<'a> {
    variable: &'a str,
    origin: &'a str,
}

/// The providers command implementation.
pub struct ProvidersCommand {
    workspace: Workspace,
    args: ProvidersArgs,
}

impl ProvidersCommand {
    pub fn new(workspace: &Workspace, args: ProvidersArgs) -> Self {
        Self {
            workspace: workspace.clone(),
            args,
        }
    }
}

impl Command for ProvidersCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut system = match self.workspace.open(None, None) {
            Ok(s) => s,
            Err(e @ SnippetError::ConfigNotFound { .. }) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(EXIT_MISUSE));
            }
            Err(e) => return Err(e),
        };

        let report = system.refresh_enhancements();
        for failure in &report.failures {
            ui.warning(&failure.to_string());
        }

        let entries: Vec<ProviderEntry> = system
            .enhancements()
            .iter()
            .map(|(variable, origin)| ProviderEntry { variable, origin })
            .collect();

        if self.args.json {
            ui.message(&serde_json::to_string_pretty(&entries)?);
            return Ok(CommandResult::success());
        }

        let theme = if should_use_colors() {
            SnippetTheme::new()
        } else {
            SnippetTheme::plain()
        };
        for entry in &entries {
            ui.message(&format!(
                "{}\t{}",
                theme.highlight.apply_to(entry.variable),
                theme.resource.apply_to(entry.origin)
            ));
        }
        Ok(CommandResult::success())
    }
}
