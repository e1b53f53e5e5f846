//! Merging driven by a Rust type's field declarations.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{KeymergeError, KeymergeResult};
use crate::merge::Merger;
use crate::options::MergeOptions;
use crate::rules::FieldRules;

/// Types that describe how their serialised documents merge.
///
/// Usually derived with `#[derive(KeyMerge)]`:
///
/// ```
/// use keymerge::{DupeMode, FieldRules, KeyMerge, ScalarMode};
///
/// #[derive(KeyMerge)]
/// struct Service {
///     #[keymerge(primary)]
///     region: String,
///     #[keymerge(primary)]
///     name: String,
///     #[keymerge(mode = "dedup")]
///     tags: Vec<String>,
/// }
///
/// #[derive(KeyMerge)]
/// struct Config {
///     #[keymerge(nested, dupe = "consolidate")]
///     services: Vec<Service>,
/// }
///
/// let rules = Config::merge_rules();
/// let services = rules.get("services").expect("services rule");
/// assert_eq!(services.primary_keys(), ["region", "name"]);
/// assert_eq!(services.dupe_mode(), Some(DupeMode::Consolidate));
/// assert_eq!(
///     rules.get("services.tags").and_then(FieldRules::scalar_mode),
///     Some(ScalarMode::Dedup)
/// );
/// ```
pub trait KeyMerge {
    /// Rules for a document of this type.
    ///
    /// The root node's primary keys identify values of this type when they
    /// appear as list items; its children describe the type's fields.
    fn merge_rules() -> FieldRules;
}

/// A [`Merger`] whose field rules come from `T`.
///
/// Rules supplied through [`MergeOptions::with_rules`] are replaced by the
/// rules derived from `T`; every other option applies unchanged.
pub struct TypedMerger<T> {
    merger: Merger,
    target: PhantomData<fn() -> T>,
}

impl<T: KeyMerge> TypedMerger<T> {
    /// Build a merger from `options` and the rules of `T`.
    ///
    /// # Errors
    ///
    /// Returns [`KeymergeError::InvalidOptions`] or
    /// [`KeymergeError::InvalidRule`] when validation fails.
    pub fn new(options: MergeOptions) -> KeymergeResult<Self> {
        let merger = Merger::new(options.with_rules(T::merge_rules()))?;
        Ok(Self {
            merger,
            target: PhantomData,
        })
    }

    /// The underlying untyped merger.
    #[must_use]
    pub const fn merger(&self) -> &Merger {
        &self.merger
    }

    /// Merge `docs` under the rules of `T`.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`Merger::merge`].
    pub fn merge<I>(&self, docs: I) -> KeymergeResult<Value>
    where
        I: IntoIterator<Item = Value>,
    {
        self.merger.merge(docs)
    }

    /// Merge `docs` and deserialise the result into `T`.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`Merger::merge`] and returns
    /// [`KeymergeError::Deserialize`] when the merged document does not fit
    /// `T`.
    pub fn merge_into<I>(&self, docs: I) -> KeymergeResult<T>
    where
        I: IntoIterator<Item = Value>,
        T: DeserializeOwned,
    {
        let merged = self.merge(docs)?;
        serde_json::from_value(merged).map_err(|source| KeymergeError::Deserialize { source })
    }
}

impl<T> Clone for TypedMerger<T> {
    fn clone(&self) -> Self {
        Self {
            merger: self.merger.clone(),
            target: PhantomData,
        }
    }
}

impl<T> fmt::Debug for TypedMerger<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedMerger")
            .field("target", &std::any::type_name::<T>())
            .field("merger", &self.merger)
            .finish()
    }
}
