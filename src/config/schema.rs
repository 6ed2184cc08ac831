//! Settings schema.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::enhancement::BuiltinOptions;

/// Runtime settings. Every field has a default, so an empty file (or no
/// file at all) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory holding packages, relative to the root.
    pub packages_path: PathBuf,

    /// Packages whose snippets and providers are hidden.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub ignored_packages: BTreeSet<String>,

    /// File suffixes that mark snippet resources.
    pub snippet_extensions: Vec<String>,

    /// Resource at a package root that advertises providers.
    pub marker_file: String,

    /// Module loaded when the marker's first line is blank.
    pub default_provider_module: String,

    /// Settle delay before acting on ignored-package changes.
    pub rescan_delay_ms: u64,

    /// Settle delay before regenerating the listing.
    pub listing_delay_ms: u64,

    /// Where the listing is written, relative to the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_path: Option<PathBuf>,

    /// strftime format for a bare `${DATE}`.
    pub date_format: String,

    /// Wrap width for buzzword text.
    pub buzzword_width: usize,

    /// Percent chance that a buzzword sentence runs on into the next.
    pub buzzword_split_chance: u32,

    /// Offer enhanced snippets as completions.
    pub auto_complete_include_snippets: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            packages_path: PathBuf::from("Packages"),
            ignored_packages: BTreeSet::new(),
            snippet_extensions: vec![
                ".sublime-snippet".to_string(),
                ".enhanced-sublime-snippet".to_string(),
            ],
            marker_file: ".enhanced-snippets".to_string(),
            default_provider_module: "enhancements".to_string(),
            rescan_delay_ms: 1000,
            listing_delay_ms: 250,
            listing_path: None,
            date_format: "%x".to_string(),
            buzzword_width: 80,
            buzzword_split_chance: 75,
            auto_complete_include_snippets: true,
        }
    }
}

impl Settings {
    /// Options for the built-in providers.
    pub fn builtin_options(&self) -> BuiltinOptions {
        BuiltinOptions {
            date_format: self.date_format.clone(),
            buzzword_width: self.buzzword_width,
            buzzword_split_chance: self.buzzword_split_chance,
            buzzword_seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let settings: Settings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_yaml_overrides_fields() {
        let yaml = "date_format: '%Y-%m-%d'\nignored_packages: [Vintage]\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.date_format, "%Y-%m-%d");
        assert!(settings.ignored_packages.contains("Vintage"));
        assert_eq!(settings.rescan_delay_ms, 1000);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_yaml::from_str::<Settings>("colour: blue").is_err());
    }

    #[test]
    fn builtin_options_follow_settings() {
        let settings = Settings {
            buzzword_width: 40,
            ..Default::default()
        };
        assert_eq!(settings.builtin_options().buzzword_width, 40);
        assert_eq!(settings.builtin_options().date_format, "%x");
    }
}
