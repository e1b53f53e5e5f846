//! Structural merging of configuration documents.
//!
//! `keymerge` folds an ordered sequence of documents into one. Objects merge
//! field by field and later scalars replace earlier ones. Lists whose items
//! carry a primary key are matched by that key rather than by position, so
//! an overlay can amend, extend, or delete individual entries of a list it
//! does not repeat in full. Lists without keys are combined by a
//! [`ScalarMode`].
//!
//! ```
//! use keymerge::{MergeOptions, merge};
//! use serde_json::json;
//!
//! let options = MergeOptions::new()
//!     .with_primary_keys(["name"])
//!     .with_delete_marker("_delete");
//! let merged = merge(
//!     options,
//!     [
//!         json!({"users": [{"name": "alice", "role": "user"}, {"name": "bob"}]}),
//!         json!({"users": [{"name": "bob", "_delete": true}, {"name": "alice", "role": "admin"}]}),
//!     ],
//! )?;
//! assert_eq!(merged, json!({"users": [{"name": "alice", "role": "admin"}]}));
//! # Ok::<(), keymerge::KeymergeError>(())
//! ```
//!
//! Per-field behaviour is configured with [`FieldRules`], built by hand,
//! parsed from directive strings, or derived from a struct with
//! `#[derive(KeyMerge)]` and applied through [`TypedMerger`].
//!
//! The deletion marker is removed from every level of the result, so a
//! document cannot carry a genuine field of the same name through a merge.
//! Deletion only acts against an existing base value: a list or object that
//! first appears in an overlay is inserted as written, so its marked items
//! are kept with the marker stripped.

mod codec;
mod error;
mod key;
mod merge;
mod options;
mod rules;
mod typed;

pub use codec::Format;
pub use error::{BoxError, KeymergeError, KeymergeResult, MergePath, PathSegment, RuleKind};
pub use key::{ItemKey, ScalarKey};
pub use merge::Merger;
pub use options::{DupeMode, MergeOptions, ParseModeError, ScalarMode};
pub use rules::FieldRules;
pub use typed::{KeyMerge, TypedMerger};

#[cfg(feature = "derive")]
pub use keymerge_macros::KeyMerge;

use serde_json::Value;

/// Validate `options` and merge `docs` in one step.
///
/// # Errors
///
/// Returns any error from [`Merger::new`] or [`Merger::merge`].
pub fn merge<I>(options: MergeOptions, docs: I) -> KeymergeResult<Value>
where
    I: IntoIterator<Item = Value>,
{
    Merger::new(options)?.merge(docs)
}
