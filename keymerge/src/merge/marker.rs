//! Deletion marker detection and removal.

use serde_json::Value;

/// Returns `true` when `value` is an object whose `marker` field is `true`.
///
/// Any other marker value, including `false` and the string `"true"`, is
/// ordinary data.
pub(crate) fn is_marked(value: &Value, marker: Option<&str>) -> bool {
    marker.is_some_and(|marker| {
        value
            .as_object()
            .and_then(|map| map.get(marker))
            .is_some_and(|flag| flag == &Value::Bool(true))
    })
}

/// Remove every `marker` field from `value` and its descendants.
pub(crate) fn strip(value: &mut Value, marker: &str) {
    match value {
        Value::Object(map) => {
            map.remove(marker);
            map.values_mut().for_each(|child| strip(child, marker));
        }
        Value::Array(items) => items.iter_mut().for_each(|item| strip(item, marker)),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}
