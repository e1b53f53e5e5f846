//! Per-field merge rules.
//!
//! [`FieldRules`] is a tree keyed by object field name. The merge engine
//! walks it alongside the documents: entering an object field moves to the
//! matching child node, while entering list items stays on the same node,
//! since a node describes both a list field and the shape of its items.
//!
//! A node may designate primary key fields for the list stored at that
//! field and override the global scalar and duplicate modes for it.
//! Overrides apply to that field only and are not inherited by descendants.

mod directive;

use std::collections::BTreeMap;

use crate::error::{KeymergeError, KeymergeResult, RuleKind};
use crate::options::{DupeMode, ScalarMode};

use directive::{Directive, parse_directives};

/// Merge overrides for one field and its descendants.
///
/// # Examples
///
/// ```
/// use keymerge::{DupeMode, FieldRules, ScalarMode};
///
/// let rules = FieldRules::new()
///     .with_field(
///         "services",
///         FieldRules::new()
///             .with_primary_keys(["region", "name"])
///             .with_dupe_mode(DupeMode::Consolidate),
///     )
///     .with_field("tags", FieldRules::new().with_scalar_mode(ScalarMode::Dedup));
///
/// let services = rules.get("services").expect("services rule");
/// assert_eq!(services.primary_keys(), ["region", "name"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldRules {
    primary_keys: Vec<String>,
    scalar_mode: Option<ScalarMode>,
    dupe_mode: Option<DupeMode>,
    children: BTreeMap<String, FieldRules>,
}

impl FieldRules {
    /// Create an empty rule node.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            primary_keys: Vec::new(),
            scalar_mode: None,
            dupe_mode: None,
            children: BTreeMap::new(),
        }
    }

    /// Designate the key fields for items of the list at this field.
    #[must_use]
    pub fn with_primary_keys<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_keys = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Override the scalar list mode for this field.
    #[must_use]
    pub const fn with_scalar_mode(mut self, mode: ScalarMode) -> Self {
        self.scalar_mode = Some(mode);
        self
    }

    /// Override duplicate handling for this field.
    #[must_use]
    pub const fn with_dupe_mode(mut self, mode: DupeMode) -> Self {
        self.dupe_mode = Some(mode);
        self
    }

    /// Attach rules for the nested field `name`, replacing existing ones.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, rules: Self) -> Self {
        self.children.insert(name.into(), rules);
        self
    }

    /// Designated key fields; empty when none are declared.
    #[must_use]
    pub fn primary_keys(&self) -> &[String] {
        &self.primary_keys
    }

    /// Scalar list mode override.
    #[must_use]
    pub const fn scalar_mode(&self) -> Option<ScalarMode> {
        self.scalar_mode
    }

    /// Duplicate handling override.
    #[must_use]
    pub const fn dupe_mode(&self) -> Option<DupeMode> {
        self.dupe_mode
    }

    /// Rules for the nested field `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.get(name)
    }

    /// Nested field rules in field-name order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Self)> {
        self.children.iter().map(|(name, rules)| (name.as_str(), rules))
    }

    /// Look up the node at a dotted path such as `services.endpoints`.
    ///
    /// The empty path returns `self`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Self> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.')
            .try_fold(self, |node, segment| node.children.get(segment))
    }

    /// Returns `true` when neither this node nor any descendant carries a rule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary_keys.is_empty()
            && self.scalar_mode.is_none()
            && self.dupe_mode.is_none()
            && self.children.values().all(Self::is_empty)
    }

    /// Parse directives and apply them to the node at a dotted path.
    ///
    /// Missing intermediate nodes are created. Later directives override
    /// earlier ones of the same kind.
    ///
    /// # Errors
    ///
    /// Returns [`KeymergeError::InvalidRule`] for an empty path segment, an
    /// unknown directive, an unrecognised mode, or an empty key component.
    /// Nothing is modified when an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use keymerge::{DupeMode, FieldRules};
    ///
    /// let mut rules = FieldRules::new();
    /// rules.insert_directives("services.databases", "key=name,dupe=consolidate")?;
    /// let node = rules.get("services.databases").expect("node");
    /// assert_eq!(node.primary_keys(), ["name"]);
    /// assert_eq!(node.dupe_mode(), Some(DupeMode::Consolidate));
    /// # Ok::<(), keymerge::KeymergeError>(())
    /// ```
    pub fn insert_directives(&mut self, path: &str, directives: &str) -> KeymergeResult<()> {
        let segments = split_path(path)?;
        let parsed = parse_directives(path, directives)?;
        let node = segments.into_iter().fold(self, |node, segment| {
            node.children.entry(segment.to_owned()).or_default()
        });
        for directive in parsed {
            node.apply(directive);
        }
        Ok(())
    }

    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::Key(fields) => self.primary_keys = fields,
            Directive::Mode(mode) => self.scalar_mode = Some(mode),
            Directive::Dupe(mode) => self.dupe_mode = Some(mode),
        }
    }

    /// Check every node for empty field names and key components.
    ///
    /// # Errors
    ///
    /// Returns [`KeymergeError::InvalidRule`] naming the offending node.
    pub fn validate(&self) -> KeymergeResult<()> {
        self.validate_at("")
    }

    fn validate_at(&self, path: &str) -> KeymergeResult<()> {
        if self.primary_keys.iter().any(String::is_empty) {
            return Err(KeymergeError::invalid_rule(
                RuleKind::Key,
                path,
                self.primary_keys.join("+"),
                "key components must be non-empty",
            ));
        }
        for (name, child) in &self.children {
            let child_path = if path.is_empty() {
                name.clone()
            } else {
                format!("{path}.{name}")
            };
            if name.is_empty() {
                return Err(KeymergeError::invalid_rule(
                    RuleKind::Field,
                    path,
                    name.as_str(),
                    "field names must be non-empty",
                ));
            }
            child.validate_at(&child_path)?;
        }
        Ok(())
    }
}

fn split_path(path: &str) -> KeymergeResult<Vec<&str>> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(KeymergeError::invalid_rule(
            RuleKind::Field,
            path,
            path,
            "path segments must be non-empty",
        ));
    }
    Ok(segments)
}
