//! Integration tests for config module public API.

use enhanced_snippets::config::{
    load_settings, parse_settings, validate, ConfigSource, Settings, CONFIG_FILE,
};
use enhanced_snippets::SnippetError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn defaults_are_valid() {
    let settings = Settings::default();
    assert!(validate(&settings).is_ok());
    assert_eq!(settings.rescan_delay_ms, 1000);
    assert_eq!(settings.listing_delay_ms, 250);
    assert!(settings.auto_complete_include_snippets);
}

#[test]
fn full_settings_workflow() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(CONFIG_FILE),
        r#"
ignored_packages: [Vintage]
date_format: "%d/%m/%Y"
buzzword_width: 40
auto_complete_include_snippets: false
"#,
    )
    .unwrap();

    let source = ConfigSource::discover(temp.path(), Some(&temp.path().join(CONFIG_FILE)));
    let settings = load_settings(&source).unwrap();
    assert!(settings.ignored_packages.contains("Vintage"));
    assert_eq!(settings.date_format, "%d/%m/%Y");
    assert_eq!(settings.buzzword_width, 40);
    assert!(!settings.auto_complete_include_snippets);
    assert_eq!(settings.marker_file, ".enhanced-snippets");
}

#[test]
fn unknown_keys_are_rejected() {
    let err = parse_settings("colour: blue\n", Path::new("s.yml")).unwrap_err();
    assert!(matches!(err, SnippetError::ConfigParse { .. }));
}

#[test]
fn split_chance_above_100_is_invalid() {
    let err = parse_settings("buzzword_split_chance: 101\n", Path::new("s.yml")).unwrap_err();
    assert!(matches!(err, SnippetError::ConfigValidation { .. }));
}

#[test]
fn missing_explicit_file_is_not_found() {
    let temp = TempDir::new().unwrap();
    let source = ConfigSource::Explicit(temp.path().join("missing.yml"));
    let err = load_settings(&source).unwrap_err();
    assert!(matches!(err, SnippetError::ConfigNotFound { .. }));
}
