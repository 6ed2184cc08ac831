//! Placeholder discovery in snippet bodies.
//!
//! A reference is a `$` not preceded by a backslash, optionally followed by
//! `{`, followed by word characters. Only the name is captured, so the
//! `:default` part of `${name:default}` is ignored.

use indexmap::IndexSet;
use regex::Regex;
use std::sync::LazyLock;

use super::EXIT_FIELD;

static NAMED_REF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{?(\w+)").unwrap());
static FIELD_REF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{?(\d+)").unwrap());

/// Placeholders referenced by a snippet body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableScan {
    /// Non-numeric names, in order of first appearance.
    pub variables: IndexSet<String>,
    /// Numeric field ids in expansion order, exit field last.
    pub fields: Vec<String>,
}

/// Scan `content` for named variables and numeric fields.
pub fn scan(content: &str) -> VariableScan {
    let variables = captures(&NAMED_REF, content)
        .filter(|name| !name.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string)
        .collect();

    let numbers: IndexSet<&str> = captures(&FIELD_REF, content).collect();

    VariableScan {
        variables,
        fields: field_order(numbers),
    }
}

/// Capture group 1 of every unescaped match.
fn captures<'a>(re: &'a Regex, content: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    re.captures_iter(content).filter_map(move |cap| {
        let whole = cap.get(0)?;
        if content[..whole.start()].ends_with('\\') {
            return None;
        }
        cap.get(1).map(|m| m.as_str())
    })
}

/// Ascending numeric order with the exit field moved (or appended) last.
fn field_order(numbers: IndexSet<&str>) -> Vec<String> {
    let mut fields: Vec<&str> = numbers
        .into_iter()
        .filter(|id| *id != EXIT_FIELD)
        .collect();
    fields.sort_by_key(|id| (id.parse::<u64>().unwrap_or(u64::MAX), *id));

    let mut fields: Vec<String> = fields.into_iter().map(str::to_string).collect();
    fields.push(EXIT_FIELD.to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(scan: &VariableScan) -> Vec<&str> {
        scan.variables.iter().map(|s| s.as_str()).collect()
    }

    #[test]
    fn empty_body_has_only_exit_field() {
        let result = scan("");
        assert!(result.variables.is_empty());
        assert_eq!(result.fields, vec!["0"]);
    }

    #[test]
    fn named_variables_keep_first_appearance_order() {
        let result = scan("${DATE} $CLIPBOARD ${BUZZWORD:3} ${DATE:%Y}");
        assert_eq!(names(&result), vec!["DATE", "CLIPBOARD", "BUZZWORD"]);
    }

    #[test]
    fn defaults_are_not_part_of_the_name() {
        let result = scan("${DATE:%Y-%m-%d}");
        assert_eq!(names(&result), vec!["DATE"]);
    }

    #[test]
    fn numeric_references_become_fields_not_variables() {
        let result = scan("Hello ${1:name}, today is ${DATE}");
        assert_eq!(names(&result), vec!["DATE"]);
        assert_eq!(result.fields, vec!["1", "0"]);
    }

    #[test]
    fn fields_sort_numerically() {
        let result = scan("$10 ${2:b} $1 ${2}");
        assert_eq!(result.fields, vec!["1", "2", "10", "0"]);
    }

    #[test]
    fn explicit_exit_field_moves_last() {
        let result = scan("${0:end} ${1:start}");
        assert_eq!(result.fields, vec!["1", "0"]);
    }

    #[test]
    fn exit_field_appears_exactly_once() {
        let result = scan("$0 ${0} ${1}");
        assert_eq!(result.fields.iter().filter(|f| *f == "0").count(), 1);
        assert_eq!(result.fields.last().map(String::as_str), Some("0"));
    }

    #[test]
    fn escaped_dollar_is_ignored() {
        let result = scan(r"\${DATE} \$1 ${CLIPBOARD}");
        assert_eq!(names(&result), vec!["CLIPBOARD"]);
        assert_eq!(result.fields, vec!["0"]);
    }

    #[test]
    fn mixed_word_after_digits_is_named() {
        let result = scan("$12abc");
        assert_eq!(names(&result), vec!["12abc"]);
        assert_eq!(result.fields, vec!["12", "0"]);
    }
}
