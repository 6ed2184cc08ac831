//! Expand command implementation.
//!
//! `enhanced-snippets expand` resolves one snippet by resource id or from
//! inline contents, runs the enhancement pipeline and prints the final
//! arguments as JSON. With `--pick` it walks the snippet's fields and
//! prompts for every one that offers choices.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::cli::args::ExpandArgs;
use crate::context::{DocumentId, EnhancedSnippets, InsertRequest};
use crate::error::{Result, SnippetError};
use crate::expansion::FinalArgs;
use crate::navigator::TextInserter;
use crate::ui::{UiPicker, UserInterface};

use super::dispatcher::{Command, CommandResult, EXIT_MISUSE};
use super::workspace::Workspace;

const DOCUMENT: DocumentId = 0;

/// What `expand` prints.
#[derive(Debug, Serialize)]
pub struct ExpandOutput {
    pub args: FinalArgs,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub choices: BTreeMap<String, String>,
}

/// Records chosen values per field in place of an editor buffer.
#[derive(Debug, Default)]
pub struct ChoiceLog {
    choices: BTreeMap<String, String>,
}

impl ChoiceLog {
    pub fn into_choices(self) -> BTreeMap<String, String> {
        self.choices
    }
}

impl TextInserter for ChoiceLog {
    fn insert_and_mark(&mut self, field: &str, text: &str) {
        self.choices.insert(field.to_string(), text.to_string());
    }

    fn select_marked(&mut self, field: &str) -> bool {
        self.choices.contains_key(field)
    }

    fn erase_marks(&mut self, field: &str) {
        self.choices.remove(field);
    }

    fn next_field(&mut self) {}
}

/// Parse `NAME=VALUE` pairs.
pub fn parse_bindings(pairs: &[String]) -> Result<BTreeMap<String, String>> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
            _ => Err(SnippetError::InvalidArguments {
                message: format!("expected NAME=VALUE, got '{}'", pair),
            }),
        })
        .collect()
}

/// Visit every field from the current one to the last, prompting where
/// choices exist.
fn walk_fields(
    system: &mut EnhancedSnippets,
    ui: &mut dyn UserInterface,
    log: &mut ChoiceLog,
) -> Result<()> {
    let mut picker = UiPicker::new(ui);
    system.field_move(DOCUMENT, 0, &mut picker, log)?;
    loop {
        let Some(navigator) = system.navigator(DOCUMENT) else {
            return Ok(());
        };
        match navigator.current_index() {
            Some(index) if index + 1 < navigator.field_count() => {
                system.field_move(DOCUMENT, 1, &mut picker, log)?;
            }
            _ => return Ok(()),
        }
    }
}

/// The expand command implementation.
pub struct ExpandCommand {
    workspace: Workspace,
    args: ExpandArgs,
}

impl ExpandCommand {
    pub fn new(workspace: &Workspace, args: ExpandArgs) -> Self {
        Self {
            workspace: workspace.clone(),
            args,
        }
    }

    fn request(&self) -> InsertRequest {
        InsertRequest {
            name: self.args.name.clone(),
            contents: self.args.contents.clone(),
            scope: self.args.scope.clone(),
            glob: self.args.glob.clone(),
        }
    }

    fn run(&self, ui: &mut dyn UserInterface) -> Result<ExpandOutput> {
        let extra = parse_bindings(&self.args.set)?;
        let mut system = self
            .workspace
            .open(self.args.clipboard.as_deref(), self.args.seed)?;
        system.refresh();

        let mut log = ChoiceLog::default();
        let args = system.insert(DOCUMENT, &self.request(), &extra, &mut log)?;
        if self.args.pick {
            walk_fields(&mut system, ui, &mut log)?;
        }
        Ok(ExpandOutput {
            args,
            choices: log.into_choices(),
        })
    }
}

impl Command for ExpandCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match self.run(ui) {
            Ok(output) => {
                ui.message(&serde_json::to_string_pretty(&output)?);
                Ok(CommandResult::success())
            }
            Err(
                e @ (SnippetError::InvalidArguments { .. } | SnippetError::ConfigNotFound { .. }),
            ) => {
                ui.error(&e.to_string());
                Ok(CommandResult::failure(EXIT_MISUSE))
            }
            Err(e @ SnippetError::LookupMiss { .. }) => {
                ui.error(&e.to_string());
                Ok(CommandResult::failure(1))
            }
            Err(e) => Err(e),
        }
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
        fs::write(
            temp.path().join("enhanced-snippets.yml"),
            "date_format: \"%Y\"\n",
        )
        .unwrap();
        let user = temp.path().join("Packages").join("User");
        fs::create_dir_all(&user).unwrap();
        fs::write(
            user.join("kind.enhanced-sublime-snippet"),
            "---\noptions:\n  - field: 1\n    placeholder: Kind\n    values: [fn, struct]\n---\n${1:kind} ${CLIPBOARD}\n",
        )
        .unwrap();
        temp
    }

    fn args() -> ExpandArgs {
        ExpandArgs {
            name: Some("Packages/User/kind.enhanced-sublime-snippet".into()),
            clipboard: Some("Widget".into()),
            ..Default::default()
        }
    }

    fn output(ui: &MockUI) -> serde_json::Value {
        serde_json::from_str(&ui.output()).unwrap()
    }

    #[test]
    fn expands_named_snippet() {
        let temp = project();
        let mut ui = MockUI::new();
        let result = ExpandCommand::new(&Workspace::new(temp.path(), None), args())
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        let out = output(&ui);
        assert_eq!(out["args"]["contents"], "${1:kind} ${CLIPBOARD}\n");
        assert_eq!(out["args"]["CLIPBOARD"], "Widget");
        assert!(out.get("choices").is_none());
        assert!(ui.prompts_shown().is_empty());
    }

    #[test]
    fn pick_prompts_for_option_fields() {
        let temp = project();
        let mut ui = MockUI::new();
        ui.queue_selection("1", Some(1));
        let args = ExpandArgs {
            pick: true,
            ..args()
        };
        ExpandCommand::new(&Workspace::new(temp.path(), None), args)
            .execute(&mut ui)
            .unwrap();

        assert_eq!(ui.prompts_shown(), &["1".to_string()]);
        assert_eq!(output(&ui)["choices"]["1"], "struct");
    }

    #[test]
    fn inline_contents_with_bindings() {
        let temp = project();
        let mut ui = MockUI::new();
        let args = ExpandArgs {
            contents: Some("${DATE} ${WHO}".into()),
            set: vec!["WHO=me".into()],
            ..Default::default()
        };
        ExpandCommand::new(&Workspace::new(temp.path(), None), args)
            .execute(&mut ui)
            .unwrap();

        let out = output(&ui);
        assert_eq!(out["args"]["WHO"], "me");
        assert_eq!(out["args"]["DATE"].as_str().unwrap().len(), 4);
    }

    #[test]
    fn name_and_contents_together_is_misuse() {
        let temp = project();
        let mut ui = MockUI::new();
        let args = ExpandArgs {
            contents: Some("x".into()),
            ..args()
        };
        let result = ExpandCommand::new(&Workspace::new(temp.path(), None), args)
            .execute(&mut ui)
            .unwrap();
        assert_eq!(result.exit_code, EXIT_MISUSE);
        assert!(ui.errors()[0].contains("exactly one"));
    }

    #[test]
    fn unknown_name_fails() {
        let temp = project();
        let mut ui = MockUI::new();
        let args = ExpandArgs {
            name: Some("Packages/User/missing.sublime-snippet".into()),
            ..Default::default()
        };
        let result = ExpandCommand::new(&Workspace::new(temp.path(), None), args)
            .execute(&mut ui)
            .unwrap();
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn bad_binding_syntax_is_rejected() {
        assert!(parse_bindings(&["NOEQUALS".to_string()]).is_err());
        assert!(parse_bindings(&["=x".to_string()]).is_err());
        let parsed = parse_bindings(&["A=b=c".to_string()]).unwrap();
        assert_eq!(parsed["A"], "b=c");
    }
}
