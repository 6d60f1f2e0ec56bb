//! Reserved operator keywords that never denote real fields or relations.

use crate::path::{PATH_DELIMITER, is_index_segment};
use std::fmt;

/// Placeholder for a numeric index segment in keyword strings (`AND.#`).
pub const INDEX_PLACEHOLDER: &str = "#";

/// The default vocabulary, in match order.
///
/// Relation quantifiers, filter conditions and logical connectors. The
/// indexed connector forms come before their bare forms so that `AND.0`
/// is consumed as a single token.
const DEFAULT_KEYWORDS: &[&str] = &[
    // relation filters
    "some",
    "none",
    "every",
    "is",
    "isNot",
    // filter conditions
    "equals",
    "not",
    "in",
    "notIn",
    "lt",
    "lte",
    "gt",
    "gte",
    "contains",
    "mode",
    "startsWith",
    "endsWith",
    // logical connectors
    "AND.#",
    "AND",
    "OR.#",
    "OR",
    "NOT",
];

/// One segment of an operator keyword.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SegmentPattern {
    /// Matches a segment equal to this token.
    Literal(String),
    /// Matches any numeric array index.
    Index,
}

impl SegmentPattern {
    /// Whether this pattern accepts `segment`.
    #[inline]
    #[must_use]
    pub fn matches(&self, segment: &str) -> bool {
        match self {
            Self::Literal(token) => token == segment,
            Self::Index => is_index_segment(segment),
        }
    }
}

/// A reserved token spanning one or more path segments.
///
/// Keywords are matched segment by segment, never as patterns, so a keyword
/// written with a literal dot (`a.b`) matches exactly the segments `a` and
/// `b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperatorKeyword {
    segments: Vec<SegmentPattern>,
}

impl OperatorKeyword {
    /// Parse a keyword string where a `#` segment stands for an index.
    ///
    /// Returns `None` for empty keywords or keywords with empty segments.
    ///
    /// ```
    /// use crud_guard::OperatorKeyword;
    ///
    /// let and = OperatorKeyword::parse("AND.#").unwrap();
    /// assert!(and.matches_at(&["AND", "0", "author"], 0));
    /// assert!(!and.matches_at(&["AND", "author"], 0));
    /// assert_eq!(and.to_string(), "AND.#");
    /// assert_eq!(OperatorKeyword::parse("a..b"), None);
    /// assert_eq!(OperatorKeyword::parse(""), None);
    /// ```
    #[must_use]
    pub fn parse(spec: &str) -> Option<Self> {
        if spec.is_empty() {
            return None;
        }
        let mut segments = Vec::new();
        for part in spec.split(PATH_DELIMITER) {
            match part {
                "" => return None,
                INDEX_PLACEHOLDER => segments.push(SegmentPattern::Index),
                token => segments.push(SegmentPattern::Literal(token.to_string())),
            }
        }
        Some(Self { segments })
    }

    /// Number of path segments this keyword spans.
    pub(crate) fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether this keyword occupies `segments[start..start + len]`.
    #[must_use]
    pub fn matches_at<S: AsRef<str>>(&self, segments: &[S], start: usize) -> bool {
        let Some(window) = segments.get(start..start + self.len()) else {
            return false;
        };
        self.segments
            .iter()
            .zip(window)
            .all(|(pattern, segment)| pattern.matches(segment.as_ref()))
    }
}

impl fmt::Display for OperatorKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pattern) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{PATH_DELIMITER}")?;
            }
            match pattern {
                SegmentPattern::Literal(token) => f.write_str(token)?,
                SegmentPattern::Index => f.write_str(INDEX_PLACEHOLDER)?,
            }
        }
        Ok(())
    }
}

/// An ordered vocabulary of operator keywords.
///
/// When several keywords match at the same position the first one listed
/// wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<OperatorKeyword>,
}

impl KeywordSet {
    /// Build a vocabulary from keywords, keeping their order.
    #[must_use]
    pub const fn new(keywords: Vec<OperatorKeyword>) -> Self {
        Self { keywords }
    }

    /// The built-in vocabulary of relation quantifiers, filter conditions
    /// and logical connectors.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(
            DEFAULT_KEYWORDS
                .iter()
                .filter_map(|spec| OperatorKeyword::parse(spec))
                .collect(),
        )
    }

    /// Parse keyword strings (see [`OperatorKeyword::parse`]).
    ///
    /// Returns the first invalid string on failure.
    pub fn parse<I, S>(specs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        specs
            .into_iter()
            .map(|spec| {
                let spec = spec.as_ref();
                OperatorKeyword::parse(spec).ok_or_else(|| spec.to_string())
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    /// The keywords, in match order.
    #[must_use]
    pub fn keywords(&self) -> &[OperatorKeyword] {
        &self.keywords
    }

    /// Span of the first keyword occupying `segments` from `start`.
    #[must_use]
    pub fn match_at<S: AsRef<str>>(&self, segments: &[S], start: usize) -> Option<usize> {
        self.keywords
            .iter()
            .find(|keyword| keyword.matches_at(segments, start))
            .map(OperatorKeyword::len)
    }

    /// Span of the first keyword whose last segment is `segments[end - 1]`.
    #[must_use]
    pub fn match_ending_at<S: AsRef<str>>(&self, segments: &[S], end: usize) -> Option<usize> {
        self.keywords
            .iter()
            .find(|keyword| {
                end.checked_sub(keyword.len())
                    .is_some_and(|start| keyword.matches_at(segments, start))
            })
            .map(OperatorKeyword::len)
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::standard()
    }
}
