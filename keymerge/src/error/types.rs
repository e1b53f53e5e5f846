//! Primary error enum for merge and configuration failures.

use std::fmt;

use thiserror::Error;

use super::MergePath;
use crate::key::ItemKey;

/// Boxed error returned by caller-supplied or built-in codecs.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Which part of a merge rule was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RuleKind {
    /// A directive that is not recognised at all.
    Unknown,
    /// A primary key declaration (`key=...`).
    Key,
    /// A scalar list mode (`mode=...`).
    Mode,
    /// A duplicate handling mode (`dupe=...`).
    Dupe,
    /// A field name or rule path segment.
    Field,
}

impl RuleKind {
    /// Returns the directive name this kind corresponds to.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Key => "key",
            Self::Mode => "mode",
            Self::Dupe => "dupe",
            Self::Field => "field",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced while configuring or running a merge.
///
/// Every merge-time variant records the zero-based index of the document
/// being folded and the [`MergePath`] of the offending value, so callers can
/// branch on the failure and report it precisely.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KeymergeError {
    /// Two items in one list share a primary key under unique mode.
    #[error(
        "duplicate primary key {key} at path {path} in document {doc_index} at positions {positions:?}"
    )]
    DuplicateKey {
        /// The repeated key value.
        key: ItemKey,
        /// Positions of the first and the repeated occurrence.
        positions: [usize; 2],
        /// Location of the repeated item.
        path: MergePath,
        /// Document being merged when the duplicate was found.
        doc_index: usize,
    },

    /// A primary key field holds an object or a list.
    #[error(
        "non-comparable primary key {key} at path {path} in document {doc_index} at position {position}"
    )]
    NonComparableKey {
        /// The offending key value rendered as JSON.
        key: String,
        /// Position of the item within its list.
        position: usize,
        /// Location of the item.
        path: MergePath,
        /// Document being merged when the key was inspected.
        doc_index: usize,
    },

    /// Merge options failed validation.
    #[error("invalid options: {message}")]
    InvalidOptions {
        /// Explanation of the rejected option.
        message: String,
    },

    /// A per-field merge rule could not be parsed.
    #[error("field '{field}': invalid {kind} rule: {message} (value: {value:?})")]
    InvalidRule {
        /// Which directive was rejected.
        kind: RuleKind,
        /// Dotted path of the field carrying the rule.
        field: String,
        /// The rejected text.
        value: String,
        /// Human-readable explanation.
        message: String,
    },

    /// A document could not be decoded.
    #[error("cannot decode document {doc_index}: {source}")]
    Decode {
        /// Index of the document that failed to decode.
        doc_index: usize,
        /// Underlying codec error.
        #[source]
        source: BoxError,
    },

    /// The merged result could not be encoded.
    #[error("cannot encode merged document: {source}")]
    Encode {
        /// Underlying codec error.
        #[source]
        source: BoxError,
    },

    /// The merged result does not fit the requested type.
    #[error("merged document does not match the target type: {source}")]
    Deserialize {
        /// Underlying deserialisation error.
        #[source]
        source: serde_json::Error,
    },
}

impl KeymergeError {
    /// Location of the offending value, for merge-time failures.
    #[must_use]
    pub const fn path(&self) -> Option<&MergePath> {
        match self {
            Self::DuplicateKey { path, .. } | Self::NonComparableKey { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Index of the document that triggered the failure, when known.
    #[must_use]
    pub const fn doc_index(&self) -> Option<usize> {
        match self {
            Self::DuplicateKey { doc_index, .. }
            | Self::NonComparableKey { doc_index, .. }
            | Self::Decode { doc_index, .. } => Some(*doc_index),
            _ => None,
        }
    }

    /// Returns `true` for failures detected before any document is merged.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidOptions { .. } | Self::InvalidRule { .. })
    }

    pub(crate) fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_rule(
        kind: RuleKind,
        field: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidRule {
            kind,
            field: field.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type KeymergeResult<T> = Result<T, KeymergeError>;
