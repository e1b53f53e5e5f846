//! Scalar list deduplication.

use std::collections::HashSet;

use serde_json::Value;

use crate::key::ScalarKey;

/// Concatenate `base` and `overlay`, keeping the first occurrence of each
/// scalar.
///
/// Objects and lists have no cheap identity and are always kept.
pub(crate) fn dedup(base: Vec<Value>, overlay: Vec<Value>) -> Vec<Value> {
    let mut seen = HashSet::with_capacity(base.len() + overlay.len());
    base.into_iter()
        .chain(overlay)
        .filter(|item| ScalarKey::from_value(item).is_none_or(|key| seen.insert(key)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn list(value: Value) -> Vec<Value> {
        match value {
            Value::Array(items) => items,
            other => vec![other],
        }
    }

    #[rstest]
    #[case::first_seen_order(json!(["a", "b", "c"]), json!(["b", "d", "a"]), json!(["a", "b", "c", "d"]))]
    #[case::duplicates_within_base(json!([1, 1, 2]), json!([2, 3]), json!([1, 2, 3]))]
    #[case::types_distinguished(json!([1, "1", true]), json!(["true", 1.0]), json!([1, "1", true, "true", 1.0]))]
    #[case::nulls_collapse(json!([null]), json!([null, "x"]), json!([null, "x"]))]
    #[case::objects_never_dropped(json!([{"a": 1}]), json!([{"a": 1}, [1], [1]]), json!([{"a": 1}, {"a": 1}, [1], [1]]))]
    fn dedup_cases(#[case] base: Value, #[case] overlay: Value, #[case] expected: Value) {
        assert_eq!(Value::Array(dedup(list(base), list(overlay))), expected);
    }
}
