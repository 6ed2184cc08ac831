//! Settings validation.

use super::schema::Settings;
use crate::error::{Result, SnippetError};

/// Check settings for values the rest of the crate cannot work with.
///
/// # Errors
///
/// Returns `ConfigValidation` naming the first offending field.
pub fn validate(settings: &Settings) -> Result<()> {
    if settings.snippet_extensions.is_empty() {
        return Err(invalid("snippet_extensions must list at least one suffix"));
    }
    if let Some(ext) = settings.snippet_extensions.iter().find(|e| e.trim().is_empty()) {
        return Err(invalid(format!("snippet_extensions contains a blank entry '{}'", ext)));
    }
    if settings.buzzword_split_chance > 100 {
        return Err(invalid(format!(
            "buzzword_split_chance must be between 0 and 100, got {}",
            settings.buzzword_split_chance
        )));
    }
    if settings.buzzword_width == 0 {
        return Err(invalid("buzzword_width must be positive"));
    }
    if settings.marker_file.trim().is_empty() || settings.marker_file.contains('/') {
        return Err(invalid("marker_file must be a plain file name"));
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> SnippetError {
    SnippetError::ConfigValidation {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate(&Settings::default()).is_ok());
    }

    #[test]
    fn empty_extensions_rejected() {
        let settings = Settings {
            snippet_extensions: vec![],
            ..Default::default()
        };
        let err = validate(&settings).unwrap_err();
        assert!(err.to_string().contains("snippet_extensions"));
    }

    #[test]
    fn split_chance_over_100_rejected() {
        let settings = Settings {
            buzzword_split_chance: 101,
            ..Default::default()
        };
        let err = validate(&settings).unwrap_err();
        assert!(err.to_string().contains("101"));
    }

    #[test]
    fn nested_marker_rejected() {
        let settings = Settings {
            marker_file: "a/b".into(),
            ..Default::default()
        };
        assert!(validate(&settings).is_err());
    }
}
