//! Dot-delimited relation paths and the allow-list they are checked against.

use std::collections::HashSet;
use std::fmt;

/// Segment separator in path strings. Literal dots cannot be escaped.
pub const PATH_DELIMITER: char = '.';

/// Split a path string into its segments.
///
/// The empty string has no segments.
///
/// ```
/// use crud_guard::split_path;
///
/// assert_eq!(split_path("author.profile.name"), vec!["author", "profile", "name"]);
/// assert!(split_path("").is_empty());
/// ```
#[must_use]
pub fn split_path(path: &str) -> Vec<&str> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split(PATH_DELIMITER).collect()
}

/// Join segments back into a path string.
#[must_use]
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push(PATH_DELIMITER);
        }
        out.push_str(segment.as_ref());
    }
    out
}

/// Whether a segment is a rendered array index (`0`, `1`, `42`...).
#[inline]
#[must_use]
pub fn is_index_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// The set of relation paths a caller may traverse.
///
/// Each entry is a pure relation path (relation names only, no fields and no
/// operators), e.g. `author` or `author.profile`. The empty path always
/// refers to the queried entity itself and is permitted without being listed.
///
/// ```
/// use crud_guard::JoinSet;
///
/// let joins = JoinSet::new(["author", "author.profile"]);
/// assert!(joins.permits(""));
/// assert!(joins.permits("author.profile"));
/// assert!(!joins.permits("author.posts"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinSet {
    paths: HashSet<String>,
}

impl JoinSet {
    /// Build an allow-list from relation paths.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// An allow-list that permits only the root entity.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether `path` is listed verbatim.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Whether a candidate relation path may be traversed: empty or listed.
    #[must_use]
    pub fn permits(&self, path: &str) -> bool {
        path.is_empty() || self.contains(path)
    }

    /// Number of listed paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether no path is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterate over the listed paths in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for JoinSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl fmt::Display for JoinSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut paths: Vec<&str> = self.iter().collect();
        paths.sort_unstable();
        write!(f, "[{}]", paths.join(", "))
    }
}
