//! `${DATE}` and `${DATE:<format>}`.

use chrono::{Local, NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::rc::Rc;

use crate::enhancement::provider::{variable_pattern, EnhancementProvider, Expansion};

/// Source of "now" for date bindings.
pub trait DateSource {
    fn now(&self) -> NaiveDateTime;
}

/// The local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDate;

impl DateSource for SystemDate {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A date source that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedDate(pub NaiveDateTime);

impl FixedDate {
    /// Midnight on the given day. Panics on an invalid date.
    pub fn ymd(year: i32, month: u32, day: u32) -> Self {
        let date = NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date");
        Self(date.and_hms_opt(0, 0, 0).expect("midnight exists"))
    }
}

impl DateSource for FixedDate {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Binds a date variable, rewriting each custom-format reference to its
/// own numbered variable.
///
/// `${DATE}` uses the default format. `${DATE:%Y}` becomes `${DATE_1}`
/// bound to the year; a second `${DATE:%Y}` reuses `DATE_1`.
pub struct DateProvider {
    variable: String,
    default_format: String,
    pattern: Regex,
    dates: Rc<dyn DateSource>,
}

impl DateProvider {
    pub fn new(
        variable: impl Into<String>,
        default_format: impl Into<String>,
        dates: Rc<dyn DateSource>,
    ) -> Self {
        let variable = variable.into();
        Self {
            pattern: variable_pattern(&variable),
            variable,
            default_format: default_format.into(),
            dates,
        }
    }
}

/// Format `now` with a strftime string, falling back to the raw format
/// text when it contains an unknown specifier.
fn format_date(now: &NaiveDateTime, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", now.format(format)).is_err() {
        tracing::warn!("Invalid date format '{}'", format);
        return format.to_string();
    }
    out
}

impl EnhancementProvider for DateProvider {
    fn variable_name(&self) -> &str {
        &self.variable
    }

    fn type_name(&self) -> &'static str {
        "DateProvider"
    }

    fn is_applicable(&self, content: &str) -> bool {
        self.pattern.is_match(content)
    }

    fn expand(&self, content: &str) -> Expansion {
        let now = self.dates.now();
        let mut bindings = BTreeMap::new();
        bindings.insert(
            self.variable.clone(),
            format_date(&now, &self.default_format),
        );
        let mut by_format: BTreeMap<String, String> = BTreeMap::new();

        let content = self
            .pattern
            .replace_all(content, |caps: &Captures| {
                let format = caps
                    .get(1)
                    .map(|m| &m.as_str()[1..])
                    .filter(|f| !f.is_empty());
                let Some(format) = format else {
                    return format!("${{{}}}", self.variable);
                };

                let name = match by_format.get(format) {
                    Some(existing) => existing.clone(),
                    None => {
                        let name = format!("{}_{}", self.variable, bindings.len());
                        bindings.insert(name.clone(), format_date(&now, format));
                        by_format.insert(format.to_string(), name.clone());
                        name
                    }
                };
                format!("${{{}}}", name)
            })
            .into_owned();

        Expansion { bindings, content }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> DateProvider {
        DateProvider::new("DATE", "%Y-%m-%d", Rc::new(FixedDate::ymd(2024, 1, 1)))
    }

    #[test]
    fn plain_reference_binds_default_format() {
        let out = provider().expand("today is ${DATE}");
        assert_eq!(out.content, "today is ${DATE}");
        assert_eq!(out.bindings.len(), 1);
        assert_eq!(out.bindings["DATE"], "2024-01-01");
    }

    #[test]
    fn custom_formats_get_numbered_variables() {
        let out = provider().expand("${DATE:%Y} ${DATE:%m} ${DATE:%Y}");
        assert_eq!(out.content, "${DATE_1} ${DATE_2} ${DATE_1}");
        assert_eq!(out.bindings["DATE_1"], "2024");
        assert_eq!(out.bindings["DATE_2"], "01");
        assert_eq!(out.bindings.len(), 3);
    }

    #[test]
    fn empty_format_collapses_to_plain() {
        let out = provider().expand("${DATE:}");
        assert_eq!(out.content, "${DATE}");
    }

    #[test]
    fn invalid_format_falls_back_to_text() {
        let out = provider().expand("${DATE:%Q}");
        assert_eq!(out.bindings["DATE_1"], "%Q");
    }

    #[test]
    fn custom_variable_name() {
        let p = DateProvider::new("TODAY", "%d/%m", Rc::new(FixedDate::ymd(2024, 3, 9)));
        assert!(p.is_applicable("${TODAY}"));
        assert!(!p.is_applicable("${DATE}"));
        assert_eq!(p.expand("${TODAY}").bindings["TODAY"], "09/03");
    }
}
