//! List command implementation.
//!
//! `enhanced-snippets list` prints the command listing for every indexed
//! snippet, or with `--scope` the snippets that apply there.

use serde::Serialize;

use crate::cli::args::ListArgs;
use crate::error::{Result, SnippetError};
use crate::listing::{build_listing, write_listing};
use crate::scope::ApplicabilityContext;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, EXIT_MISUSE};
use super::workspace::Workspace;

/// One applicable snippet in `--scope --json` output.
#[derive(Debug, Serialize)]
struct ApplicableEntry<'a> {
    resource: &'a str,
    trigger: &'a str,
    description: &'a str,
}

/// The list command implementation.
pub struct ListCommand {
    workspace: Workspace,
    args: ListArgs,
}

impl ListCommand {
    pub fn new(workspace: &Workspace, args: ListArgs) -> Self {
        Self {
            workspace: workspace.clone(),
            args,
        }
    }

    pub fn args(&self) -> &ListArgs {
        &self.args
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut system = match self.workspace.open(None, None) {
            Ok(s) => s,
            Err(e @ SnippetError::ConfigNotFound { .. }) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(EXIT_MISUSE));
            }
            Err(e) => return Err(e),
        };
        system.refresh();
        let index = system.snippets().snapshot();

        if let Some(path) = &self.args.write {
            write_listing(&index, path)?;
            ui.success(&format!(
                "Wrote {} listing entries to {}",
                index.len(),
                path.display()
            ));
        }

        if let Some(scope) = &self.args.scope {
            let mut context = ApplicabilityContext::at(scope.as_str());
            if let Some(file) = &self.args.file {
                context = context.with_filename(file.as_str());
            }
            let snippets = system.applicable(&context);

            if self.args.json {
                let entries: Vec<ApplicableEntry> = snippets
                    .iter()
                    .map(|s| ApplicableEntry {
                        resource: s.resource(),
                        trigger: s.trigger(),
                        description: s.description(),
                    })
                    .collect();
                ui.message(&serde_json::to_string_pretty(&entries)?);
            } else {
                for snippet in &snippets {
                    ui.message(&format!("{}\t{}", snippet.title(), snippet.resource()));
                }
            }
            return Ok(CommandResult::success());
        }

        let entries = build_listing(&index);
        if self.args.json {
            ui.message(&serde_json::to_string_pretty(&entries)?);
        } else if self.args.write.is_none() {
            for entry in &entries {
                ui.message(&format!("{}\t{}", entry.caption, entry.args.name));
            }
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
            "<snippet><tabTrigger>today</tabTrigger><content>${DATE}</content>\
             <scope>source.rust</scope></snippet>",
        )
        .unwrap();
        fs::write(
            user.join("note.enhanced-sublime-snippet"),
            "---\ndescription: Note\nscope: text.plain\n---\nNote on ${DATE}\n",
        )
        .unwrap();
        temp
    }

    fn run(temp: &TempDir, args: ListArgs) -> MockUI {
        let mut ui = MockUI::new();
        ListCommand::new(&Workspace::new(temp.path(), None), args)
            .execute(&mut ui)
            .unwrap();
        ui
    }

    #[test]
    fn lists_every_indexed_snippet() {
        let temp = project();
        let ui = run(&temp, ListArgs::default());
        assert_eq!(ui.messages().len(), 2);
        assert!(ui.messages()[0].starts_with("Snippet: Note\t"));
        assert!(ui.messages()[1].starts_with("Snippet: today\t"));
    }

    #[test]
    fn scope_filters_to_applicable_snippets() {
        let temp = project();
        let ui = run(
            &temp,
            ListArgs {
                scope: Some("source.rust".into()),
                json: true,
                ..Default::default()
            },
        );
        let entries: serde_json::Value = serde_json::from_str(&ui.output()).unwrap();
        assert_eq!(entries.as_array().unwrap().len(), 1);
        assert_eq!(entries[0]["trigger"], "today");
    }

    #[test]
    fn write_creates_listing_file() {
        let temp = project();
        let path = temp.path().join("out").join("listing.json");
        let ui = run(
            &temp,
            ListArgs {
                write: Some(path.clone()),
                ..Default::default()
            },
        );
        assert_eq!(ui.successes().len(), 1);
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written[0]["command"], "insert_enhanced_snippet");
    }
}
