//! Turning raw tree paths into candidate relation paths.
//!
//! A leaf path such as `posts.some.AND.0.author.name.equals` mixes relation
//! names, field names and operator keywords. The [`PathClassifier`] strips
//! the keywords and the trailing field name, in a fixed order, leaving the
//! relation path `posts.author` that must appear in the allow-list.
//!
//! | Stage  | Removes                                             |
//! |--------|-----------------------------------------------------|
//! | start  | keywords occupying the leading segments             |
//! | middle | keywords strictly inside the path                   |
//! | end    | keywords ending at the final segment                |
//! | last   | the final remaining segment (the leaf's own field)  |
//!
//! The last segment goes last: removing it first would mistake a relation
//! name standing before an operator for the leaf's field.

mod keyword;

pub use keyword::{INDEX_PLACEHOLDER, KeywordSet, OperatorKeyword, SegmentPattern};

use crate::path::{join_path, split_path};

/// Compiled stripping stages for one keyword vocabulary.
///
/// ```
/// use crud_guard::PathClassifier;
///
/// let classifier = PathClassifier::default();
/// assert_eq!(classifier.candidate_relation_path("author.profile.name.equals"), "author.profile");
/// assert_eq!(classifier.candidate_relation_path("OR.1.posts.some.title.contains"), "posts");
/// assert_eq!(classifier.candidate_relation_path("name.equals"), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathClassifier {
    keywords: KeywordSet,
}

impl PathClassifier {
    /// Build a classifier over a keyword vocabulary.
    #[must_use]
    pub const fn new(keywords: KeywordSet) -> Self {
        Self { keywords }
    }

    /// The vocabulary this classifier strips.
    #[must_use]
    pub const fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// Remove keywords occupying the leading segments.
    pub fn strip_start<S: AsRef<str>>(&self, segments: &mut Vec<S>) {
        while let Some(span) = self.keywords.match_at(segments.as_slice(), 0) {
            segments.drain(..span);
        }
    }

    /// Remove every keyword that starts after the first segment and ends
    /// before the last one. Consecutive keywords are all removed.
    pub fn strip_middle<S: AsRef<str>>(&self, segments: &mut Vec<S>) {
        let mut i = 1;
        while i + 1 < segments.len() {
            let inner = segments.len() - 1;
            let span = self
                .keywords
                .match_at(segments.get(..inner).unwrap_or_default(), i);
            match span {
                Some(span) => {
                    segments.drain(i..i + span);
                },
                None => i += 1,
            }
        }
    }

    /// Remove keywords ending at the final segment. The first segment is
    /// never treated as a trailing keyword.
    pub fn strip_end<S: AsRef<str>>(&self, segments: &mut Vec<S>) {
        loop {
            let end = segments.len();
            match self.keywords.match_ending_at(segments.as_slice(), end) {
                Some(span) if span < end => segments.truncate(end - span),
                _ => break,
            }
        }
    }

    /// Remove the final segment, keyword or not.
    pub fn strip_last_segment<S>(segments: &mut Vec<S>) {
        segments.pop();
    }

    /// Run all four stages over a segment list.
    #[must_use]
    pub fn candidate_segments<'p, S: AsRef<str>>(&self, segments: &'p [S]) -> Vec<&'p str> {
        let mut out: Vec<&str> = segments.iter().map(|s| s.as_ref()).collect();
        self.strip_start(&mut out);
        self.strip_middle(&mut out);
        self.strip_end(&mut out);
        Self::strip_last_segment(&mut out);
        out
    }

    /// Run all four stages over a dot-delimited path.
    #[must_use]
    pub fn candidate_relation_path(&self, path: &str) -> String {
        join_path(&self.candidate_segments(&split_path(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(path: &str) -> String {
        PathClassifier::default().candidate_relation_path(path)
    }

    #[test]
    fn test_keyword_free_path_drops_last_segment() {
        assert_eq!(strip("author.profile.firstName"), "author.profile");
        assert_eq!(strip("title"), "");
        assert_eq!(strip(""), "");
    }

    #[test]
    fn test_trailing_operator_then_field() {
        assert_eq!(strip("name.equals"), "");
        assert_eq!(strip("author.name.equals"), "author");
        assert_eq!(strip("tags.in"), "");
    }

    #[test]
    fn test_leading_logical_connectors() {
        assert_eq!(strip("AND.0.author.name.equals"), "author");
        assert_eq!(strip("NOT.author.name"), "author");
        assert_eq!(strip("OR.1.AND.0.author.name"), "author");
        assert_eq!(strip("AND"), "");
    }

    #[test]
    fn test_middle_keywords_collapse() {
        assert_eq!(strip("posts.some.title.contains"), "posts");
        assert_eq!(strip("posts.every.comments.none.body.startsWith"), "posts.comments");
        assert_eq!(strip("author.is.profile.bio.mode"), "author.profile");
    }

    #[test]
    fn test_consecutive_middle_keywords() {
        assert_eq!(strip("posts.some.AND.0.author.name.equals"), "posts.author");
        assert_eq!(strip("author.name.not.equals"), "author");
    }

    #[test]
    fn test_field_named_like_keyword_prefix() {
        // whole-segment matching only
        assert_eq!(strip("isActive.equals"), "");
        assert_eq!(strip("author.isVerified.equals"), "author");
        assert_eq!(strip("inventory.items.count"), "inventory.items");
    }

    #[test]
    fn test_stage_order_matters() {
        let classifier = PathClassifier::default();
        let mut segments = vec!["author", "name", "equals"];
        PathClassifier::strip_last_segment(&mut segments);
        classifier.strip_end(&mut segments);
        // wrong order leaves the field name behind
        assert_eq!(segments, vec!["author", "name"]);
    }

    #[test]
    fn test_individual_stages() {
        let classifier = PathClassifier::default();

        let mut segments = vec!["OR", "0", "NOT", "author", "is", "name", "equals"];
        classifier.strip_start(&mut segments);
        assert_eq!(segments, vec!["author", "is", "name", "equals"]);
        classifier.strip_middle(&mut segments);
        assert_eq!(segments, vec!["author", "name", "equals"]);
        classifier.strip_end(&mut segments);
        assert_eq!(segments, vec!["author", "name"]);
        PathClassifier::strip_last_segment(&mut segments);
        assert_eq!(segments, vec!["author"]);
    }

    #[test]
    fn test_end_stage_keeps_first_segment() {
        let classifier = PathClassifier::default();
        let mut segments = vec!["equals"];
        classifier.strip_end(&mut segments);
        assert_eq!(segments, vec!["equals"]);
    }

    #[test]
    fn test_custom_vocabulary_with_literal_dot() {
        let classifier = PathClassifier::new(KeywordSet::parse(["json.path", "equals"]).unwrap());
        assert_eq!(
            classifier.candidate_relation_path("author.meta.json.path.equals"),
            "author"
        );
        // the standard vocabulary is not active here
        assert_eq!(classifier.candidate_relation_path("posts.some.title"), "posts.some");
    }
}
