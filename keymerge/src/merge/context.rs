//! Location tracking for merge errors.

use crate::error::{MergePath, PathSegment};

/// Document index and path of the value currently being merged.
///
/// Owned by a single merge call, so concurrent merges never share one.
#[derive(Debug, Default)]
pub(crate) struct MergeContext {
    doc_index: usize,
    path: Vec<PathSegment>,
}

impl MergeContext {
    pub(crate) fn reset(&mut self, doc_index: usize) {
        self.doc_index = doc_index;
        self.path.clear();
    }

    pub(crate) const fn doc_index(&self) -> usize {
        self.doc_index
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.path.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.path.pop();
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.path.len()
    }

    /// The current path followed by `segment`, leaving the stack untouched.
    pub(crate) fn snapshot_with(&self, segment: PathSegment) -> MergePath {
        MergePath::from_segments(self.path.iter().cloned().chain(std::iter::once(segment)))
    }
}
