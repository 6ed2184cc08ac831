//! Fixed-value providers declared by provider modules.

use crate::enhancement::provider::{EnhancementProvider, Expansion};

/// Binds a variable to a fixed string.
#[derive(Debug, Clone)]
pub struct TextProvider {
    variable: String,
    value: String,
}

impl TextProvider {
    pub fn new(variable: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            value: value.into(),
        }
    }
}

impl EnhancementProvider for TextProvider {
    fn variable_name(&self) -> &str {
        &self.variable
    }

    fn type_name(&self) -> &'static str {
        "TextProvider"
    }

    fn expand(&self, content: &str) -> Expansion {
        Expansion::single(content, &self.variable, self.value.clone())
    }
}

/// Binds a variable to the value of an environment variable, when set.
#[derive(Debug, Clone)]
pub struct EnvProvider {
    variable: String,
    name: String,
}

impl EnvProvider {
    pub fn new(variable: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            name: name.into(),
        }
    }
}

impl EnhancementProvider for EnvProvider {
    fn variable_name(&self) -> &str {
        &self.variable
    }

    fn type_name(&self) -> &'static str {
        "EnvProvider"
    }

    fn expand(&self, content: &str) -> Expansion {
        match std::env::var(&self.name) {
            Ok(value) => Expansion::single(content, &self.variable, value),
            Err(_) => Expansion::unchanged(content),
        }
    }
}
