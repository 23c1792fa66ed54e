//! Document paths for addressing nodes
//!
//! Provides [`DocPath`] for hierarchical addressing of values inside a document tree.

use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// One step of a [`DocPath`]: an object key or an array index
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    /// Object member name
    Key(String),
    /// Array position
    Index(usize),
}

impl Segment {
    /// Segment as an object key
    ///
    /// Indices render as their decimal form, so `0` addresses the key `"0"`
    /// when the container turns out to be an object.
    #[must_use]
    pub fn as_key(&self) -> Cow<'_, str> {
        match self {
            Self::Key(key) => Cow::Borrowed(key),
            Self::Index(index) => Cow::Owned(index.to_string()),
        }
    }

    /// Whether this segment addresses an array slot
    #[inline]
    #[must_use]
    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }

    /// Name of the container kind this segment expects
    #[inline]
    #[must_use]
    pub fn container_kind(&self) -> &'static str {
        match self {
            Self::Key(_) => "object",
            Self::Index(_) => "array",
        }
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Path within a document tree
///
/// # Examples
/// - `["hero", "headlineStyle", "color"]` → `hero.headlineStyle.color`
/// - `["banners", 0, "text"]` → `banners.0.text`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DocPath(Vec<Segment>);

impl DocPath {
    /// Create new path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<Segment>) -> Self {
        Self(segments)
    }

    /// Empty path (root)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path made of a single key
    #[inline]
    #[must_use]
    pub fn key(key: impl Into<String>) -> Self {
        Self(vec![Segment::Key(key.into())])
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get first segment (if not root)
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&Segment> {
        self.0.first()
    }

    /// Get last segment (if not root)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&Segment> {
        self.0.last()
    }

    /// Path without its first segment
    #[must_use]
    pub fn tail(&self) -> Self {
        Self(self.0.iter().skip(1).cloned().collect())
    }

    /// First `len` segments of this path
    #[must_use]
    pub fn prefix(&self, len: usize) -> Self {
        Self(self.0.iter().take(len).cloned().collect())
    }

    /// Append a key segment, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, key: impl Into<String>) -> Self {
        self.with(Segment::Key(key.into()))
    }

    /// Append an index segment, returning new path
    #[inline]
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.with(Segment::Index(index))
    }

    /// Append any segment, returning new path
    #[must_use]
    pub fn with(&self, segment: Segment) -> Self {
        let mut new = self.clone();
        new.0.push(segment);
        new
    }

    /// Check if this path is a prefix of another
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.0.len() <= other.0.len() && self.0 == other.0[..self.0.len()]
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.0.iter()
    }
}

impl Display for DocPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for DocPath {
    type Err = PathError;

    /// Parse a dotted path; all-digit segments become indices
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }

        let segments = s
            .split('.')
            .map(|seg| {
                if seg.is_empty() {
                    Err(PathError::EmptySegment)
                } else if seg.chars().any(|c| c.is_whitespace() || c.is_control()) {
                    Err(PathError::InvalidSegment(seg.to_string()))
                } else if seg.bytes().all(|b| b.is_ascii_digit()) {
                    seg.parse::<usize>()
                        .map(Segment::Index)
                        .map_err(|_| PathError::InvalidSegment(seg.to_string()))
                } else {
                    Ok(Segment::Key(seg.to_string()))
                }
            })
            .collect::<Result<_, _>>()?;

        Ok(Self(segments))
    }
}

impl From<Vec<Segment>> for DocPath {
    fn from(segments: Vec<Segment>) -> Self {
        Self(segments)
    }
}

impl FromIterator<Segment> for DocPath {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Errors related to document paths and path mutation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Mutation addressed the root itself
    #[error("path is empty; the root cannot be replaced through a path")]
    EmptyPath,

    /// Empty segment in path
    #[error("path contains empty segment")]
    EmptySegment,

    /// Invalid segment characters
    #[error("invalid segment: {0:?}")]
    InvalidSegment(String),

    /// An existing node cannot hold the next segment
    #[error("cannot descend into {found} at '{at}' (expected {expected})")]
    TypeMismatch {
        /// Path of the offending node
        at: String,
        /// Container kind the segment needs
        expected: &'static str,
        /// Kind actually found
        found: &'static str,
    },

    /// Array write too far past the end
    #[error("index {index} at '{at}' is out of range for array of length {len}")]
    IndexOutOfRange {
        /// Path of the array
        at: String,
        /// Requested index
        index: usize,
        /// Current array length
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_from_str_mixed_segments() {
        let path: DocPath = "banners.0.text".parse().unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("banners".into()),
                Segment::Index(0),
                Segment::Key("text".into())
            ]
        );
    }

    #[test]
    fn path_from_str_empty_is_root() {
        let path: DocPath = "".parse().unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn path_from_str_empty_segment() {
        let result: Result<DocPath, _> = "a..b".parse();
        assert!(matches!(result, Err(PathError::EmptySegment)));
    }

    #[test]
    fn path_from_str_rejects_whitespace() {
        let result: Result<DocPath, _> = "hero.head line".parse();
        assert!(matches!(result, Err(PathError::InvalidSegment(_))));
    }

    #[test]
    fn path_from_str_keeps_dashes_in_keys() {
        let path: DocPath = "extra.data-attr".parse().unwrap();
        assert_eq!(path.last(), Some(&Segment::Key("data-attr".into())));
    }

    #[test]
    fn path_display_round_trips() {
        let path = DocPath::key("steps").index(2).child("fieldIds");
        assert_eq!(path.to_string(), "steps.2.fieldIds");
        assert_eq!(path.to_string().parse::<DocPath>().unwrap(), path);
    }

    #[test]
    fn path_tail_and_prefix() {
        let path: DocPath = "a.b.c".parse().unwrap();
        assert_eq!(path.tail().to_string(), "b.c");
        assert_eq!(path.prefix(2).to_string(), "a.b");
        assert!(path.prefix(2).is_prefix_of(&path));
        assert!(!path.is_prefix_of(&path.prefix(2)));
    }

    #[test]
    fn index_segment_as_key() {
        assert_eq!(Segment::Index(7).as_key(), "7");
        assert_eq!(Segment::from("x").as_key(), "x");
    }
}
