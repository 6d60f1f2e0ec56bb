//! Relation-path validation for `orderBy` sort expressions.

use super::walk::{Node, Visit, walk};
use crate::path::join_path;
use crate::{GuardError, JoinSet};
use serde_json::Value;

/// Check every relation path implied by a list of sort expressions.
///
/// Each element is walked in turn. A node is a leaf when its value is
/// neither an object nor an array; the leaf's final segment is the sorted
/// field and everything before it must be an allowed relation path (or
/// empty). Sort expressions carry no operators, so nothing else is
/// stripped. The first refused path across the whole list aborts.
///
/// ```
/// use crud_guard::{JoinSet, validate_nested_order_by};
/// use serde_json::json;
///
/// let order_by = [json!({"createdAt": "desc"}), json!({"author": {"firstName": "asc"}})];
/// assert!(validate_nested_order_by(&order_by, &JoinSet::new(["author"])).is_ok());
///
/// let err = validate_nested_order_by(&order_by, &JoinSet::empty()).unwrap_err();
/// assert_eq!(err.rejected_path(), Some("author"));
/// ```
pub fn validate_nested_order_by(order_by: &[Value], allowed: &JoinSet) -> Result<(), GuardError> {
    for expression in order_by {
        walk(expression, &mut |path, node| {
            if !matches!(node, Node::Scalar) {
                return Ok(Visit::Descend);
            }

            let relation = path.split_last().map_or_else(String::new, |(_, rest)| join_path(rest));
            if !allowed.permits(&relation) {
                tracing::warn!(
                    path = %join_path(path),
                    candidate = %relation,
                    kind = "orderBy",
                    "join relation not allowed"
                );
                return Err(GuardError::rejected(relation));
            }
            tracing::debug!(path = %join_path(path), candidate = %relation, "orderBy leaf accepted");
            Ok(Visit::Skip)
        })?;
    }
    Ok(())
}
