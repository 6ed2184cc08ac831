//! Running providers over a snippet body.
//!
//! The pipeline looks up one provider per variable the snippet references,
//! in first-appearance order, and threads the body through each of them.
//! The result is the argument map the host's snippet insertion expects:
//! every binding plus the final body under `contents`.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::enhancement::EnhancementRegistry;
use crate::snippet::Snippet;

/// Key of the snippet body in [`FinalArgs::into_map`].
pub const CONTENTS_KEY: &str = "contents";

/// Variable bindings plus the rewritten body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FinalArgs {
    #[serde(flatten)]
    pub bindings: BTreeMap<String, String>,
    pub contents: String,
}

impl FinalArgs {
    /// Flatten into one map, with the body under `contents`.
    pub fn into_map(self) -> BTreeMap<String, String> {
        let mut map = self.bindings;
        map.insert(CONTENTS_KEY.to_string(), self.contents);
        map
    }
}

/// Expands snippets against an [`EnhancementRegistry`].
pub struct ExpansionPipeline<'a> {
    registry: &'a EnhancementRegistry,
}

impl<'a> ExpansionPipeline<'a> {
    pub fn new(registry: &'a EnhancementRegistry) -> Self {
        Self { registry }
    }

    /// Expand `snippet`.
    ///
    /// `extra` bindings are applied first, so a provider binding the same
    /// name overrides them. Among providers the later one wins.
    pub fn expand(&self, snippet: &Snippet, extra: &BTreeMap<String, String>) -> FinalArgs {
        let providers = self
            .registry
            .providers_for(snippet.variables().iter().map(String::as_str));

        let mut bindings = extra.clone();
        let mut content = snippet.content().to_string();
        for provider in providers {
            let expansion = provider.expand(&content);
            tracing::debug!(
                "{} produced {} bindings for {}",
                provider.variable_name(),
                expansion.bindings.len(),
                snippet.resource()
            );
            bindings.extend(expansion.bindings);
            content = expansion.content;
        }
        bindings.remove(CONTENTS_KEY);

        FinalArgs {
            bindings,
            contents: content.trim_start().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enhancement::{EnhancementProvider, Expansion, TextProvider};
    use crate::snippet::SnippetParts;

    fn snippet(content: &str) -> Snippet {
        Snippet::from_parts(
            SnippetParts {
                content: content.into(),
                ..Default::default()
            },
            "Packages/User/t.sublime-snippet",
        )
    }

    /// Rewrites `${UPPER}` to `${UPPER_0}` and binds both names.
    struct Upper;

    impl EnhancementProvider for Upper {
        fn variable_name(&self) -> &str {
            "UPPER"
        }

        fn expand(&self, content: &str) -> Expansion {
            let mut out = Expansion::single(
                &content.replace("${UPPER}", "${UPPER_0}"),
                "UPPER_0",
                "LOUD",
            );
            out.bindings.insert("SHARED".into(), "upper".into());
            out
        }
    }

    /// Sees the body after earlier providers ran.
    struct Echo;

    impl EnhancementProvider for Echo {
        fn variable_name(&self) -> &str {
            "ECHO"
        }

        fn expand(&self, content: &str) -> Expansion {
            let mut out = Expansion::single(content, "ECHO", content.to_string());
            out.bindings.insert("SHARED".into(), "echo".into());
            out
        }
    }

    fn registry() -> EnhancementRegistry {
        let mut registry = EnhancementRegistry::new();
        registry.register("Test.mod", Box::new(Upper));
        registry.register("Test.mod", Box::new(Echo));
        registry.register("Test.mod", Box::new(TextProvider::new("NAME", "Ada")));
        registry
    }

    #[test]
    fn providers_run_in_first_appearance_order() {
        let registry = registry();
        let pipeline = ExpansionPipeline::new(&registry);
        let args = pipeline.expand(&snippet("${UPPER} ${ECHO}"), &BTreeMap::new());

        assert_eq!(args.contents, "${UPPER_0} ${ECHO}");
        assert_eq!(args.bindings["ECHO"], "${UPPER_0} ${ECHO}");
        assert_eq!(args.bindings["SHARED"], "echo");

        let args = pipeline.expand(&snippet("${ECHO} ${UPPER}"), &BTreeMap::new());
        assert_eq!(args.bindings["ECHO"], "${ECHO} ${UPPER}");
        assert_eq!(args.bindings["SHARED"], "upper");
    }

    #[test]
    fn providers_override_extra_bindings() {
        let registry = registry();
        let extra: BTreeMap<String, String> = [
            ("NAME".to_string(), "Grace".to_string()),
            ("OTHER".to_string(), "kept".to_string()),
        ]
        .into();
        let args = ExpansionPipeline::new(&registry).expand(&snippet("Hi ${NAME}"), &extra);
        assert_eq!(args.bindings["NAME"], "Ada");
        assert_eq!(args.bindings["OTHER"], "kept");
    }

    #[test]
    fn unknown_variables_are_left_alone() {
        let registry = registry();
        let args = ExpansionPipeline::new(&registry)
            .expand(&snippet("\n\n  ${MISSING} $1"), &BTreeMap::new());
        assert!(args.bindings.is_empty());
        assert_eq!(args.contents, "${MISSING} $1");
    }

    #[test]
    fn contents_key_is_reserved() {
        let registry = EnhancementRegistry::new();
        let extra: BTreeMap<String, String> = [("contents".to_string(), "x".to_string())].into();
        let args = ExpansionPipeline::new(&registry).expand(&snippet("body"), &extra);
        assert!(args.bindings.is_empty());
        assert_eq!(args.clone().into_map()["contents"], "body");

        let json = serde_json::to_value(&args).unwrap();
        assert_eq!(json, serde_json::json!({"contents": "body"}));
    }

    #[test]
    fn expansion_is_repeatable() {
        let registry = registry();
        let pipeline = ExpansionPipeline::new(&registry);
        let s = snippet("${NAME} ${UPPER}");
        assert_eq!(
            pipeline.expand(&s, &BTreeMap::new()),
            pipeline.expand(&s, &BTreeMap::new())
        );
    }
}
