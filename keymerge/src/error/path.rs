//! Document locations attached to merge errors.

use std::fmt;

/// One step along a [`MergePath`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Descent into an object field.
    Field(String),
    /// Descent into a list item at the given position.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(position) => write!(f, "{position}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        Self::Field(name.to_owned())
    }
}

impl From<usize> for PathSegment {
    fn from(position: usize) -> Self {
        Self::Index(position)
    }
}

/// Location of a value inside a document, from the root downwards.
///
/// Renders as dot-separated segments, or `(root)` when empty.
///
/// # Examples
///
/// ```
/// use keymerge::{MergePath, PathSegment};
///
/// let path = MergePath::from_segments([
///     PathSegment::from("teams"),
///     PathSegment::from(0),
///     PathSegment::from("members"),
/// ]);
/// assert_eq!(path.to_string(), "teams.0.members");
/// assert_eq!(MergePath::root().to_string(), "(root)");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MergePath(Vec<PathSegment>);

impl MergePath {
    /// The empty path addressing the document root.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path from an ordered sequence of segments.
    #[must_use]
    pub fn from_segments<I>(segments: I) -> Self
    where
        I: IntoIterator<Item = PathSegment>,
    {
        Self(segments.into_iter().collect())
    }

    /// Segments from the root downwards.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Returns `true` when the path addresses the document root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Render each segment as a string, matching the dotted form.
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for MergePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
