//! Parsing of comma-separated rule directives such as `key=name,dupe=consolidate`.

use crate::error::{KeymergeError, KeymergeResult, RuleKind};
use crate::options::{DupeMode, ScalarMode};

/// A single parsed directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Directive {
    /// `key=a+b`: designated key fields, composite when more than one.
    Key(Vec<String>),
    /// `mode=...`: scalar list mode.
    Mode(ScalarMode),
    /// `dupe=...`: duplicate handling.
    Dupe(DupeMode),
}

/// Parse `text` into directives, attributing errors to `field`.
///
/// Blank entries are ignored so `"key=id,"` parses like `"key=id"`.
pub(crate) fn parse_directives(field: &str, text: &str) -> KeymergeResult<Vec<Directive>> {
    text.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| parse_directive(field, entry))
        .collect()
}

fn parse_directive(field: &str, entry: &str) -> KeymergeResult<Directive> {
    let Some((name, raw)) = entry.split_once('=') else {
        return Err(KeymergeError::invalid_rule(
            RuleKind::Unknown,
            field,
            entry,
            "expected NAME=VALUE with NAME one of key, mode, dupe",
        ));
    };
    let value = raw.trim();
    match name.trim() {
        "key" => parse_key(field, value).map(Directive::Key),
        "mode" => value
            .parse::<ScalarMode>()
            .map(Directive::Mode)
            .map_err(|e| e.into_rule_error(field)),
        "dupe" => value
            .parse::<DupeMode>()
            .map(Directive::Dupe)
            .map_err(|e| e.into_rule_error(field)),
        _ => Err(KeymergeError::invalid_rule(
            RuleKind::Unknown,
            field,
            entry,
            "unknown directive",
        )),
    }
}

fn parse_key(field: &str, value: &str) -> KeymergeResult<Vec<String>> {
    let components: Vec<String> = value.split('+').map(|c| c.trim().to_owned()).collect();
    if components.iter().any(String::is_empty) {
        return Err(KeymergeError::invalid_rule(
            RuleKind::Key,
            field,
            value,
            "key components must be non-empty",
        ));
    }
    Ok(components)
}
