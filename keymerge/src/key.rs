//! Primary key extraction for list items.
//!
//! A list item is identified by the values of one or more designated
//! fields. Only scalars can act as identities: they are projected into
//! [`ScalarKey`], which is hashable, while objects and lists are reported as
//! non-comparable so the caller can raise a structured error.

use std::fmt;

use serde_json::{Number, Value};

/// A hashable projection of a scalar document value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKey {
    /// JSON `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number; `1` and `1.0` are distinct keys.
    Number(Number),
    /// A string.
    String(String),
}

impl ScalarKey {
    /// Project `value` into a key, or `None` for objects and lists.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for ScalarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// Identity of a list item: one component per designated key field.
///
/// Components keep the declaration order of the key fields, so two items
/// match only when every component is equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemKey(Vec<ScalarKey>);

impl ItemKey {
    /// Build a key from its components.
    #[must_use]
    pub const fn new(components: Vec<ScalarKey>) -> Self {
        Self(components)
    }

    /// Build a single-field key.
    #[must_use]
    pub fn single(component: ScalarKey) -> Self {
        Self(vec![component])
    }

    /// Components in key-field order.
    #[must_use]
    pub fn components(&self) -> &[ScalarKey] {
        &self.0
    }

    /// Returns `true` when more than one field makes up the key.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.0.len() > 1
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [single] = self.0.as_slice() {
            return write!(f, "{single}");
        }
        f.write_str("(")?;
        for (i, component) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{component}")?;
        }
        f.write_str(")")
    }
}

/// Outcome of looking up an item's key.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum KeyLookup {
    /// The item is not an object, or a key field is absent or null.
    Missing,
    /// Every key field holds a scalar.
    Found(ItemKey),
    /// A key field holds an object or a list, rendered as JSON.
    NonComparable(String),
}

/// The key fields used to match the items of one list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct KeyStrategy<'a> {
    fields: &'a [String],
}

impl<'a> KeyStrategy<'a> {
    pub(crate) const fn new(fields: &'a [String]) -> Self {
        Self { fields }
    }

    pub(crate) const fn fields(&self) -> &'a [String] {
        self.fields
    }

    /// Pick the key fields for a list from its overlay items.
    ///
    /// Declared fields win whenever any overlay item carries them. Otherwise
    /// the first candidate name that is present and non-null on the first
    /// such item becomes a single-field key. Returns `None` when no overlay
    /// item yields a key.
    pub(crate) fn discover(
        overlay: &[Value],
        declared: &'a [String],
        candidates: &'a [String],
    ) -> Option<Self> {
        if !declared.is_empty() {
            let strategy = Self::new(declared);
            return overlay
                .iter()
                .any(|item| !matches!(strategy.extract(item), KeyLookup::Missing))
                .then_some(strategy);
        }
        overlay.iter().find_map(move |item| {
            let map = item.as_object()?;
            candidates
                .iter()
                .position(|name| map.get(name).is_some_and(|v| !v.is_null()))
                .and_then(|i| candidates.get(i..=i))
                .map(Self::new)
        })
    }

    /// Extract the key of `item` under this strategy.
    ///
    /// A non-comparable component is reported even when another component is
    /// missing.
    pub(crate) fn extract(&self, item: &Value) -> KeyLookup {
        let Some(map) = item.as_object() else {
            return KeyLookup::Missing;
        };
        let mut components = Vec::with_capacity(self.fields.len());
        let mut complete = true;
        for field in self.fields {
            match map.get(field) {
                None | Some(Value::Null) => complete = false,
                Some(value) => match ScalarKey::from_value(value) {
                    Some(component) => components.push(component),
                    None => return KeyLookup::NonComparable(value.to_string()),
                },
            }
        }
        if complete {
            KeyLookup::Found(ItemKey::new(components))
        } else {
            KeyLookup::Missing
        }
    }
}
