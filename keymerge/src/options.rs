//! Merge configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{KeymergeError, KeymergeResult, RuleKind};
use crate::rules::FieldRules;

/// How lists without identifiable items are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarMode {
    /// Base items followed by overlay items, duplicates retained.
    #[default]
    Concat,
    /// Concatenation keeping the first occurrence of each scalar.
    Dedup,
    /// The overlay list replaces the base list.
    Replace,
}

impl ScalarMode {
    /// Returns the lowercase spelling used in directives and on the CLI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Concat => "concat",
            Self::Dedup => "dedup",
            Self::Replace => "replace",
        }
    }
}

impl fmt::Display for ScalarMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScalarMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concat" => Ok(Self::Concat),
            "dedup" => Ok(Self::Dedup),
            "replace" => Ok(Self::Replace),
            other => Err(ParseModeError::new(
                RuleKind::Mode,
                other,
                "concat, dedup, replace",
            )),
        }
    }
}

/// How items sharing a primary key within one document are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DupeMode {
    /// Reject the document with [`KeymergeError::DuplicateKey`].
    #[default]
    Unique,
    /// Fold later occurrences into the first one.
    Consolidate,
}

impl DupeMode {
    /// Returns the lowercase spelling used in directives and on the CLI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unique => "unique",
            Self::Consolidate => "consolidate",
        }
    }
}

impl fmt::Display for DupeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DupeMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unique" => Ok(Self::Unique),
            "consolidate" => Ok(Self::Consolidate),
            other => Err(ParseModeError::new(
                RuleKind::Dupe,
                other,
                "unique, consolidate",
            )),
        }
    }
}

/// Error returned when a mode name is not recognised.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'; valid: {expected}")]
pub struct ParseModeError {
    kind: RuleKind,
    value: String,
    expected: &'static str,
}

impl ParseModeError {
    fn new(kind: RuleKind, value: &str, expected: &'static str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
            expected,
        }
    }

    /// Which mode family was being parsed.
    #[must_use]
    pub const fn kind(&self) -> RuleKind {
        self.kind
    }

    /// The rejected spelling.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Attach the field the mode was declared on.
    pub(crate) fn into_rule_error(self, field: &str) -> KeymergeError {
        KeymergeError::invalid_rule(
            self.kind,
            field,
            self.value,
            format!("valid: {}", self.expected),
        )
    }
}

/// Options controlling a merge.
///
/// The default value is usable as-is: no key matching (every list is
/// combined by [`ScalarMode::Concat`]), deletion disabled, and duplicate keys
/// rejected.
///
/// # Examples
///
/// ```
/// use keymerge::{DupeMode, MergeOptions, ScalarMode};
///
/// let options = MergeOptions::new()
///     .with_primary_keys(["name", "id"])
///     .with_delete_marker("_delete")
///     .with_scalar_mode(ScalarMode::Dedup)
///     .with_dupe_mode(DupeMode::Consolidate);
/// assert_eq!(options.delete_marker(), Some("_delete"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeOptions {
    primary_key_names: Vec<String>,
    delete_marker: Option<String>,
    scalar_mode: ScalarMode,
    dupe_mode: DupeMode,
    rules: FieldRules,
}

impl MergeOptions {
    /// Create options with every setting at its default.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            primary_key_names: Vec::new(),
            delete_marker: None,
            scalar_mode: ScalarMode::Concat,
            dupe_mode: DupeMode::Unique,
            rules: FieldRules::new(),
        }
    }

    /// Candidate key field names, tried in order on each list item.
    #[must_use]
    pub fn with_primary_keys<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Field name whose boolean `true` value requests deletion.
    ///
    /// An empty name disables deletion.
    #[must_use]
    pub fn with_delete_marker(mut self, marker: impl Into<String>) -> Self {
        let marker = marker.into();
        self.delete_marker = (!marker.is_empty()).then_some(marker);
        self
    }

    /// Default mode for lists whose items carry no key.
    #[must_use]
    pub const fn with_scalar_mode(mut self, mode: ScalarMode) -> Self {
        self.scalar_mode = mode;
        self
    }

    /// Default handling of duplicate keys within one document.
    #[must_use]
    pub const fn with_dupe_mode(mut self, mode: DupeMode) -> Self {
        self.dupe_mode = mode;
        self
    }

    /// Per-field overrides, replacing any rules set previously.
    #[must_use]
    pub fn with_rules(mut self, rules: FieldRules) -> Self {
        self.rules = rules;
        self
    }

    /// Candidate key field names.
    #[must_use]
    pub fn primary_key_names(&self) -> &[String] {
        &self.primary_key_names
    }

    /// The deletion marker, when deletion is enabled.
    #[must_use]
    pub fn delete_marker(&self) -> Option<&str> {
        self.delete_marker.as_deref()
    }

    /// Default scalar list mode.
    #[must_use]
    pub const fn scalar_mode(&self) -> ScalarMode {
        self.scalar_mode
    }

    /// Default duplicate handling.
    #[must_use]
    pub const fn dupe_mode(&self) -> DupeMode {
        self.dupe_mode
    }

    /// Per-field overrides.
    #[must_use]
    pub const fn rules(&self) -> &FieldRules {
        &self.rules
    }

    /// Mutable access to the per-field overrides.
    pub const fn rules_mut(&mut self) -> &mut FieldRules {
        &mut self.rules
    }

    /// Check the options before any document is merged.
    ///
    /// # Errors
    ///
    /// Returns [`KeymergeError::InvalidOptions`] when a candidate key name is
    /// empty, and [`KeymergeError::InvalidRule`] when a per-field key
    /// declaration contains an empty field name.
    pub fn validate(&self) -> KeymergeResult<()> {
        if let Some(position) = self.primary_key_names.iter().position(String::is_empty) {
            return Err(KeymergeError::invalid_options(format!(
                "empty string in primary key names at position {position}"
            )));
        }
        self.rules.validate()
    }
}
