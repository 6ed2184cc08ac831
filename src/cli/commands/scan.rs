//! Scan command implementation.
//!
//! `enhanced-snippets scan` runs a full provider and snippet discovery and
//! reports what was indexed and what failed.

use serde::Serialize;

use crate::cli::args::ScanArgs;
use crate::error::{Result, SnippetError};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, EXIT_MISUSE};
use super::workspace::Workspace;

/// Machine-readable scan summary.
#[derive(Debug, Serialize)]
pub struct ScanSummary {
    pub providers: usize,
    pub indexed: usize,
    pub plain: usize,
    pub packages: Vec<String>,
    pub collisions: Vec<String>,
    pub failures: Vec<String>,
}

/// The scan command implementation.
pub struct ScanCommand {
    workspace: Workspace,
    args: ScanArgs,
}

impl ScanCommand {
    pub fn new(workspace: &Workspace, args: ScanArgs) -> Self {
        Self {
            workspace: workspace.clone(),
            args,
        }
    }
}

impl Command for ScanCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut system = match self.workspace.open(None, None) {
            Ok(s) => s,
            Err(e @ SnippetError::ConfigNotFound { .. }) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(EXIT_MISUSE));
            }
            Err(e) => return Err(e),
        };

        let (providers, snippets) = system.refresh();
        let summary = ScanSummary {
            providers: system.enhancements().len(),
            indexed: snippets.indexed,
            plain: snippets.plain,
            packages: system
                .snippets()
                .snapshot()
                .packages()
                .map(str::to_string)
                .collect(),
            collisions: providers
                .collisions
                .iter()
                .map(|c| {
                    format!(
                        "{} from {} replaced {}",
                        c.variable, c.origin, c.previous_origin
                    )
                })
                .collect(),
            failures: providers
                .failures
                .iter()
                .chain(snippets.failures.iter())
                .map(ToString::to_string)
                .collect(),
        };

        if self.args.json {
            ui.message(&serde_json::to_string_pretty(&summary)?);
        } else {
            for collision in &summary.collisions {
                ui.warning(collision);
            }
            for failure in &summary.failures {
                ui.warning(failure);
            }
            if ui.output_mode().shows_detail() {
                for snippet in system.snippets().snapshot().iter() {
                    ui.message(&format!("  {}", snippet.resource()));
                }
            }
            ui.success(&format!(
                "Indexed {} enhanced snippets from {} packages ({} plain, {} providers)",
                summary.indexed,
                summary.packages.len(),
                summary.plain,
                summary.providers
            ));
        }

        if self.args.strict && !summary.failures.is_empty() {
            return Ok(CommandResult::failure(1));
        }
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        let user = temp.path().join("Packages").join("User");
        fs::create_dir_all(&user).unwrap();
        fs::write(
            user.join("today.sublime-snippet"),
            "<snippet><content>${DATE}</content></snippet>",
        )
        .unwrap();
        fs::write(
            user.join("plain.sublime-snippet"),
            "<snippet><content>plain</content></snippet>",
        )
        .unwrap();
        fs::write(user.join("broken.sublime-snippet"), "not a snippet").unwrap();
        temp
    }

    #[test]
    fn scan_reports_counts() {
        let temp = project();
        let cmd = ScanCommand::new(&Workspace::new(temp.path(), None), ScanArgs::default());
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert_eq!(ui.warnings().len(), 1);
        assert!(ui.successes()[0].starts_with("Indexed 1 enhanced snippets from 1 packages"));
    }

    #[test]
    fn strict_scan_fails_on_broken_resource() {
        let temp = project();
        let args = ScanArgs {
            strict: true,
            json: true,
        };
        let mut ui = MockUI::new();
        let result = ScanCommand::new(&Workspace::new(temp.path(), None), args)
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, 1);
        let summary: serde_json::Value = serde_json::from_str(&ui.output()).unwrap();
        assert_eq!(summary["indexed"], 1);
        assert_eq!(summary["plain"], 1);
        assert_eq!(summary["packages"][0], "User");
    }

    #[test]
    fn missing_explicit_settings_is_misuse() {
        let temp = TempDir::new().unwrap();
        let workspace = Workspace::new(temp.path(), Some(temp.path().join("nope.yml")));
        let mut ui = MockUI::new();
        let result = ScanCommand::new(&workspace, ScanArgs::default())
            .execute(&mut ui)
            .unwrap();
        assert_eq!(result.exit_code, EXIT_MISUSE);
        assert_eq!(ui.errors().len(), 1);
    }
}
