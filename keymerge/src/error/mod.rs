//! Error types produced by the merge engine.

mod path;
mod types;

pub use path::{MergePath, PathSegment};
pub use types::{BoxError, KeymergeError, KeymergeResult, RuleKind};
