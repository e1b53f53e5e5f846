//! Unit tests for the merge engine.

use serde_json::Value;

use crate::{KeymergeResult, MergeOptions, Merger};

mod lists;

/// Options keyed on `name` then `id`, with `_delete` as the marker.
fn keyed_options() -> MergeOptions {
    MergeOptions::new()
        .with_primary_keys(["name", "id"])
        .with_delete_marker("_delete")
}

fn merge_with(options: MergeOptions, docs: Vec<Value>) -> KeymergeResult<Value> {
    Merger::new(options)?.merge(docs)
}
