// =============================================================================
// CRATE-LEVEL QUALITY LINTS
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Operator keywords in docs read better unquoted
#![allow(clippy::missing_errors_doc)] // Every public fn returns GuardError for the same reason
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable
#![allow(clippy::must_use_candidate)] // Builder methods - fluent API doesn't need must_use

//! # crud-guard - Relation-path access control for query trees
//!
//! Generic CRUD endpoints accept nested `where` filters and `orderBy`
//! expressions that can reach into related entities. `crud-guard` decides
//! whether every relation such a query traverses is on an allow-list.
//!
//! ## Quick Start
//!
//! ```
//! use crud_guard::prelude::*;
//! use serde_json::json;
//!
//! let allowed = JoinSet::new(["author", "author.profile"]);
//!
//! // `author` is a joined relation, `name` its field, `equals` an operator
//! let filter = json!({"author": {"name": {"equals": "Ann"}}});
//! assert!(validate_nested_where(&filter, &allowed).is_ok());
//!
//! // `posts` is not on the allow-list
//! let filter = json!({"posts": {"some": {"title": {"contains": "rust"}}}});
//! let err = validate_nested_where(&filter, &allowed).unwrap_err();
//! assert_eq!(err.to_string(), "join relation not allowed: posts");
//! assert_eq!(err.status_code(), 403);
//! ```
//!
//! ## Relation Paths
//!
//! Each leaf of a filter tree has a dot-delimited path from the root. The
//! [`PathClassifier`] removes operator keywords and the trailing field name:
//!
//! | Leaf path                                  | Relation path    |
//! |--------------------------------------------|------------------|
//! | `title.contains`                           | (root)           |
//! | `author.name.equals`                       | `author`         |
//! | `OR.1.author.profile.bio.startsWith`       | `author.profile` |
//! | `posts.some.AND.0.comments.every.body`     | `posts.comments` |
//! | `tags.in` (the whole array is one leaf)    | (root)           |
//!
//! The empty relation path is the queried entity itself and is always
//! allowed.
//!
//! ## Full Queries
//!
//! [`CrudGuard`] checks the request envelope (see [`validate_crud_query`])
//! and then the `joins`, `where` and `orderBy` parts against one allow-list.
//!
//! ## Nesting Depth
//!
//! Trees are walked recursively with no depth limit. Bound the nesting of
//! decoded requests before calling into this crate.

mod classify;
mod config;
mod envelope;
mod error;
mod guard;
mod path;
mod validate;

pub use classify::{INDEX_PLACEHOLDER, KeywordSet, OperatorKeyword, PathClassifier, SegmentPattern};
pub use config::{ConfigError, GuardConfig};
pub use envelope::{CrudQuery, Selection, validate_crud_query};
pub use error::GuardError;
pub use guard::CrudGuard;
pub use path::{JoinSet, PATH_DELIMITER, is_index_segment, join_path, split_path};
pub use validate::{
    validate_joins, validate_nested_order_by, validate_nested_where, validate_nested_where_with,
};

/// Prelude module for convenient imports.
///
/// ```
/// use crud_guard::prelude::*;
///
/// let guard = CrudGuard::new(["author"]);
/// assert!(guard.allowed().contains("author"));
/// ```
pub mod prelude {
    pub use crate::{
        CrudGuard, CrudQuery, GuardConfig, GuardError, JoinSet, KeywordSet, OperatorKeyword,
        PathClassifier, validate_crud_query, validate_joins, validate_nested_order_by,
        validate_nested_where, validate_nested_where_with,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quick_start_table() {
        let classifier = PathClassifier::default();
        let rows = [
            ("title.contains", ""),
            ("author.name.equals", "author"),
            ("OR.1.author.profile.bio.startsWith", "author.profile"),
            ("posts.some.AND.0.comments.every.body", "posts.comments"),
            ("tags.in", ""),
        ];
        for (leaf, relation) in rows {
            assert_eq!(classifier.candidate_relation_path(leaf), relation, "leaf {leaf}");
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EDGE CASE TESTS
    // ═══════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_any_allow_list_accepts_empty_tree() {
        for allowed in [JoinSet::empty(), JoinSet::new(["a", "a.b"])] {
            assert!(validate_nested_where(&json!({}), &allowed).is_ok());
            assert!(validate_nested_order_by(&[], &allowed).is_ok());
            assert!(validate_joins::<&str>(&[], &allowed).is_ok());
        }
    }

    #[test]
    fn test_membership_array_elements_not_checked() {
        // `tags.in.0` and `tags.in.1` would otherwise reduce to `tags`
        let tree = json!({"tags": {"in": ["a", "b"]}});
        assert!(validate_nested_where(&tree, &JoinSet::empty()).is_ok());
    }

    #[test]
    fn test_order_by_and_joins_reporting() {
        let order_by = [json!({"author": {"firstName": "asc"}})];
        assert!(validate_nested_order_by(&order_by, &JoinSet::new(["author"])).is_ok());
        assert_eq!(
            validate_nested_order_by(&order_by, &JoinSet::empty()).unwrap_err().rejected_path(),
            Some("author")
        );

        let err = validate_joins(&["author", "author.posts"], &JoinSet::new(["author"])).unwrap_err();
        assert_eq!(err.rejected_path(), Some("author.posts"));
    }
}

// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
