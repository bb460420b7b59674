use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// One path segment of a request.
///
/// Segments of the same request share the segment list, so a token can see
/// where it sits in the path it came from. Equality ignores case.
#[derive(Clone)]
pub struct Segment {
    segments: Arc<[String]>,
    index: usize,
}

impl Segment {
    pub(crate) fn new(segments: Arc<[String]>, index: usize) -> Self {
        debug_assert!(index < segments.len());
        Self { segments, index }
    }

    /// A segment that does not come from a request path.
    pub fn standalone(value: impl Into<String>) -> Self {
        Self::new(Arc::from(vec![value.into()]), 0)
    }

    pub fn as_str(&self) -> &str {
        &self.segments[self.index]
    }

    /// Zero-based position in the originating path.
    pub fn position(&self) -> usize {
        self.index
    }

    /// Every routed segment of the originating path.
    pub fn path(&self) -> &[String] {
        &self.segments
    }

    /// Segments following this one.
    pub fn rest(&self) -> &[String] {
        &self.segments[self.index + 1..]
    }
}

fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self == other.as_str()
    }
}

impl Eq for Segment {}

impl PartialEq<str> for Segment {
    fn eq(&self, other: &str) -> bool {
        folded(self.as_str()).eq(folded(other))
    }
}

impl PartialEq<&str> for Segment {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Hash for Segment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in folded(self.as_str()) {
            c.hash(state);
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("value", &self.as_str())
            .field("position", &self.index)
            .finish()
    }
}

/// One ordered token-sequence interpretation of a request.
#[derive(Debug, Clone, PartialEq)]
pub struct Message<T> {
    tokens: Vec<T>,
}

impl<T> Message<T> {
    pub fn new(tokens: Vec<T>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[T] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl<T> From<Vec<T>> for Message<T> {
    fn from(tokens: Vec<T>) -> Self {
        Self::new(tokens)
    }
}

impl<'a, T> IntoIterator for &'a Message<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
