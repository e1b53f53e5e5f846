//! The structural merge engine.
//!
//! Documents are folded left to right. Objects merge field by field, lists
//! merge by primary key when their items carry one and by the configured
//! [`ScalarMode`](crate::ScalarMode) otherwise, and every other combination
//! is resolved in favour of the later document. A final pass removes the
//! deletion marker from the result.

mod context;
mod dedup;
mod list;
mod marker;

use serde_json::{Map, Value};
use tracing::{debug, instrument, trace};

use crate::error::{BoxError, KeymergeError, KeymergeResult, PathSegment};
use crate::options::MergeOptions;
use crate::rules::FieldRules;

use context::MergeContext;

/// A validated merge configuration, reusable across any number of merges.
///
/// Each call to [`Merger::merge`] tracks its own location state, so one
/// `Merger` can be shared between threads.
///
/// # Examples
///
/// ```
/// use keymerge::{MergeOptions, Merger};
/// use serde_json::json;
///
/// let merger = Merger::new(MergeOptions::new().with_primary_keys(["name"]))?;
/// let merged = merger.merge([
///     json!({"users": [{"name": "alice", "role": "user"}]}),
///     json!({"users": [{"name": "alice", "role": "admin"}, {"name": "bob"}]}),
/// ])?;
/// assert_eq!(
///     merged,
///     json!({"users": [{"name": "alice", "role": "admin"}, {"name": "bob"}]})
/// );
/// # Ok::<(), keymerge::KeymergeError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Merger {
    options: MergeOptions,
}

impl Merger {
    /// Validate `options` and build a merger from them.
    ///
    /// # Errors
    ///
    /// Returns [`KeymergeError::InvalidOptions`] or
    /// [`KeymergeError::InvalidRule`] when the options fail
    /// [`MergeOptions::validate`].
    pub fn new(options: MergeOptions) -> KeymergeResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// The options this merger was built with.
    #[must_use]
    pub const fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Merge `docs` left to right, later documents taking precedence.
    ///
    /// Zero documents produce `null`.
    ///
    /// # Errors
    ///
    /// Returns [`KeymergeError::DuplicateKey`] or
    /// [`KeymergeError::NonComparableKey`] on the first offending list item.
    /// No partial result is returned.
    #[instrument(level = "debug", skip_all)]
    pub fn merge<I>(&self, docs: I) -> KeymergeResult<Value>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut run = MergeRun::new(&self.options);
        let mut result = Value::Null;
        for (doc_index, doc) in docs.into_iter().enumerate() {
            trace!(doc_index, "folding document");
            run.ctx.reset(doc_index);
            result = run.merge_values(result, doc, Some(self.options.rules()))?;
        }
        if let Some(delete_marker) = self.options.delete_marker() {
            marker::strip(&mut result, delete_marker);
        }
        Ok(result)
    }

    /// Decode each document, merge them, and encode the result.
    ///
    /// Zero documents produce empty output without calling either codec.
    ///
    /// # Errors
    ///
    /// Returns [`KeymergeError::Decode`] naming the first document that fails
    /// to decode, any error from [`Merger::merge`], or
    /// [`KeymergeError::Encode`] when the result cannot be encoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use keymerge::{MergeOptions, Merger};
    ///
    /// let merger = Merger::new(MergeOptions::new().with_primary_keys(["id"]))?;
    /// let out = merger.merge_encoded(
    ///     |bytes| serde_json::from_slice(bytes),
    ///     |value| serde_json::to_vec(value),
    ///     [&br#"[{"id": 1, "a": 1}]"#[..], &br#"[{"id": 1, "b": 2}]"#[..]],
    /// )?;
    /// assert_eq!(out, br#"[{"a":1,"b":2,"id":1}]"#);
    /// # Ok::<(), keymerge::KeymergeError>(())
    /// ```
    pub fn merge_encoded<D, E, DE, EE, I, B>(
        &self,
        mut decode: D,
        encode: E,
        docs: I,
    ) -> KeymergeResult<Vec<u8>>
    where
        D: FnMut(&[u8]) -> Result<Value, DE>,
        E: FnOnce(&Value) -> Result<Vec<u8>, EE>,
        DE: Into<BoxError>,
        EE: Into<BoxError>,
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let decoded = docs
            .into_iter()
            .enumerate()
            .map(|(doc_index, bytes)| {
                decode(bytes.as_ref()).map_err(|e| KeymergeError::Decode {
                    doc_index,
                    source: e.into(),
                })
            })
            .collect::<KeymergeResult<Vec<_>>>()?;
        if decoded.is_empty() {
            return Ok(Vec::new());
        }
        let merged = self.merge(decoded)?;
        encode(&merged).map_err(|e| KeymergeError::Encode { source: e.into() })
    }
}

/// State for one call to [`Merger::merge`].
struct MergeRun<'m> {
    options: &'m MergeOptions,
    ctx: MergeContext,
}

impl<'m> MergeRun<'m> {
    fn new(options: &'m MergeOptions) -> Self {
        Self {
            options,
            ctx: MergeContext::default(),
        }
    }

    /// Run `f` with `segment` pushed onto the path, popping it on every exit.
    fn descend<T>(
        &mut self,
        segment: PathSegment,
        f: impl FnOnce(&mut Self) -> KeymergeResult<T>,
    ) -> KeymergeResult<T> {
        self.ctx.push(segment);
        let result = f(self);
        self.ctx.pop();
        result
    }

    fn merge_values(
        &mut self,
        base: Value,
        overlay: Value,
        rules: Option<&'m FieldRules>,
    ) -> KeymergeResult<Value> {
        match (base, overlay) {
            (kept, Value::Null) => Ok(kept),
            (Value::Null, replacement) => Ok(replacement),
            (Value::Object(base_map), Value::Object(overlay_map)) => self
                .merge_maps(base_map, overlay_map, rules)
                .map(Value::Object),
            (Value::Array(base_items), Value::Array(overlay_items)) => self
                .merge_lists(base_items, overlay_items, rules)
                .map(Value::Array),
            (_, replacement) => Ok(replacement),
        }
    }

    fn merge_maps(
        &mut self,
        mut result: Map<String, Value>,
        overlay: Map<String, Value>,
        rules: Option<&'m FieldRules>,
    ) -> KeymergeResult<Map<String, Value>> {
        let delete_marker = self.options.delete_marker();
        for (key, value) in overlay {
            if marker::is_marked(&value, delete_marker) {
                if result.remove(&key).is_some() {
                    debug!(field = %key, "deleted field");
                }
                continue;
            }
            let Some(slot) = result.get_mut(&key) else {
                result.insert(key, value);
                continue;
            };
            let child_rules = rules.and_then(|r| r.child(&key));
            let existing = std::mem::take(slot);
            *slot = self.descend(PathSegment::Field(key), |run| {
                run.merge_values(existing, value, child_rules)
            })?;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests;
