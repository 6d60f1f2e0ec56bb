//! Relation-path validation for nested `where` filter trees.

use super::walk::{Node, Visit, walk};
use crate::path::{is_index_segment, join_path};
use crate::{GuardError, JoinSet, PathClassifier};
use serde_json::Value;
use std::sync::LazyLock;

/// Operators whose array value is a single leaf rather than a list of leaves.
const MEMBERSHIP_OPERATORS: [&str; 2] = ["in", "notIn"];

static STANDARD_CLASSIFIER: LazyLock<PathClassifier> = LazyLock::new(PathClassifier::default);

/// Check every relation path implied by a `where` tree against `allowed`.
///
/// Uses the standard operator vocabulary. See
/// [`validate_nested_where_with`] for the leaf rules.
///
/// ```
/// use crud_guard::{JoinSet, validate_nested_where};
/// use serde_json::json;
///
/// let allowed = JoinSet::new(["author"]);
/// let tree = json!({"title": {"contains": "rust"}, "author": {"name": {"equals": "Ann"}}});
/// assert!(validate_nested_where(&tree, &allowed).is_ok());
///
/// let tree = json!({"author": {"profile": {"bio": {"contains": "x"}}}});
/// let err = validate_nested_where(&tree, &allowed).unwrap_err();
/// assert_eq!(err.rejected_path(), Some("author.profile"));
/// ```
pub fn validate_nested_where(tree: &Value, allowed: &JoinSet) -> Result<(), GuardError> {
    validate_nested_where_with(tree, allowed, &STANDARD_CLASSIFIER)
}

/// Check a `where` tree using a specific keyword vocabulary.
///
/// A node is a leaf when either:
/// - its path ends in `in`/`notIn` (below some field) and its value is an
///   array: the array as a whole is the leaf and its elements are never
///   visited, even when it is empty;
/// - its value is neither an object nor an array, unless it sits directly
///   under `in`/`notIn` at an index.
///
/// Every leaf path is reduced by `classifier`; an empty result refers to
/// the root entity. Siblings are checked in insertion order and the first
/// refused path aborts the walk. Nesting depth is not limited here.
pub fn validate_nested_where_with(
    tree: &Value,
    allowed: &JoinSet,
    classifier: &PathClassifier,
) -> Result<(), GuardError> {
    walk(tree, &mut |path, node| {
        let leaf = match node {
            Node::Sequence(_) => is_membership_array(path),
            Node::Mapping(_) => false,
            Node::Scalar => !is_membership_element(path),
        };
        if !leaf {
            return Ok(Visit::Descend);
        }

        let candidate = join_path(&classifier.candidate_segments(path));
        if !allowed.permits(&candidate) {
            tracing::warn!(
                path = %join_path(path),
                candidate = %candidate,
                kind = "where",
                "join relation not allowed"
            );
            return Err(GuardError::rejected(candidate));
        }
        tracing::debug!(path = %join_path(path), candidate = %candidate, "where leaf accepted");
        Ok(Visit::Skip)
    })
}

/// `….in` / `….notIn` with at least one segment before the operator.
fn is_membership_array(path: &[String]) -> bool {
    match path {
        [_, .., last] => MEMBERSHIP_OPERATORS.contains(&last.as_str()),
        _ => false,
    }
}

/// `….in.<index>` / `….notIn.<index>` with at least one segment before.
fn is_membership_element(path: &[String]) -> bool {
    match path {
        [_, .., op, index] => {
            MEMBERSHIP_OPERATORS.contains(&op.as_str()) && is_index_segment(index)
        },
        _ => false,
    }
}
