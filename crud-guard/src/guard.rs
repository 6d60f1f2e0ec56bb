//! One-stop validation of a full CRUD query.

use crate::config::{ConfigError, GuardConfig};
use crate::envelope::{CrudQuery, validate_crud_query};
use crate::validate::{validate_joins, validate_nested_order_by, validate_nested_where_with};
use crate::{GuardError, JoinSet, KeywordSet, PathClassifier};
use serde_json::Value;

/// An allow-list paired with a keyword vocabulary.
///
/// Immutable once built; share it between request handlers freely.
///
/// ```
/// use crud_guard::CrudGuard;
/// use serde_json::json;
///
/// let guard = CrudGuard::new(["author"]);
/// let query = json!({
///     "where": {"author": {"name": {"startsWith": "A"}}},
///     "joins": ["author"],
///     "select": {},
///     "orderBy": [{"author": {"name": "asc"}}]
/// });
/// assert!(guard.check(&query).is_ok());
///
/// let query = json!({"where": {}, "joins": ["editor"], "select": {}});
/// assert_eq!(guard.check(&query).unwrap_err().status_code(), 403);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrudGuard {
    allowed: JoinSet,
    classifier: PathClassifier,
}

impl CrudGuard {
    /// A guard over `allowed` with the standard keyword vocabulary.
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_keywords(JoinSet::new(allowed), KeywordSet::standard())
    }

    /// A guard with a custom keyword vocabulary.
    #[must_use]
    pub const fn with_keywords(allowed: JoinSet, keywords: KeywordSet) -> Self {
        Self {
            allowed,
            classifier: PathClassifier::new(keywords),
        }
    }

    /// Build a guard from loaded configuration.
    pub fn from_config(config: &GuardConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_keywords(config.join_set(), config.keyword_set()?))
    }

    /// The allow-list.
    #[must_use]
    pub const fn allowed(&self) -> &JoinSet {
        &self.allowed
    }

    /// The path classifier used for `where` trees.
    #[must_use]
    pub const fn classifier(&self) -> &PathClassifier {
        &self.classifier
    }

    /// Check the envelope of a decoded query, then every path in it.
    pub fn check(&self, query: &Value) -> Result<CrudQuery, GuardError> {
        let query = validate_crud_query(query)?;
        self.check_query(&query)?;
        Ok(query)
    }

    /// Check the paths of a query whose envelope is already known good.
    ///
    /// Joins are checked first, then the `where` tree, then `orderBy`.
    pub fn check_query(&self, query: &CrudQuery) -> Result<(), GuardError> {
        self.check_joins(query.joins.as_slice())?;
        self.check_where(&query.filter)?;
        self.check_order_by(query.sort_expressions())
    }

    /// See [`validate_joins`].
    pub fn check_joins<S: AsRef<str>>(&self, requested: &[S]) -> Result<(), GuardError> {
        validate_joins(requested, &self.allowed)
    }

    /// See [`validate_nested_where_with`].
    pub fn check_where(&self, tree: &Value) -> Result<(), GuardError> {
        validate_nested_where_with(tree, &self.allowed, &self.classifier)
    }

    /// See [`validate_nested_order_by`].
    pub fn check_order_by(&self, order_by: &[Value]) -> Result<(), GuardError> {
        validate_nested_order_by(order_by, &self.allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_errors_come_first() {
        let guard = CrudGuard::new(Vec::<String>::new());
        let err = guard
            .check(&json!({"where": {"author": {"name": "x"}}, "joins": ["author"]}))
            .unwrap_err();
        assert!(matches!(err, GuardError::MalformedRequest { .. }));
    }

    #[test]
    fn test_joins_checked_before_where() {
        let guard = CrudGuard::new(["author"]);
        let query = CrudQuery::new(json!({"editor": {"name": "x"}})).join("reviewer");
        assert_eq!(guard.check_query(&query), Err(GuardError::rejected("reviewer")));
    }

    #[test]
    fn test_where_checked_before_order_by() {
        let guard = CrudGuard::new(["author"]);
        let query = CrudQuery::new(json!({"editor": {"name": "x"}}))
            .sort_by(json!({"reviewer": {"name": "asc"}}));
        assert_eq!(guard.check_query(&query), Err(GuardError::rejected("editor")));

        let query = CrudQuery::new(json!({})).sort_by(json!({"reviewer": {"name": "asc"}}));
        assert_eq!(guard.check_query(&query), Err(GuardError::rejected("reviewer")));
    }

    #[test]
    fn test_check_returns_parsed_query() {
        let guard = CrudGuard::new(["posts"]);
        let query = guard
            .check(&json!({
                "where": {"posts": {"some": {"title": {"contains": "rust"}}}},
                "joins": ["posts"],
                "select": {"except": ["password"]},
                "pageSize": 20
            }))
            .unwrap();
        assert_eq!(query.page_size, Some(20));
    }

    #[test]
    fn test_from_config() {
        let config = GuardConfig::from_toml_str(
            r#"
            allowed_joins = ["author"]
            keywords = ["$eq"]
            "#,
        )
        .unwrap();
        let guard = CrudGuard::from_config(&config).unwrap();
        assert!(guard.allowed().contains("author"));
        assert!(guard.check_where(&json!({"author": {"name": {"$eq": "x"}}})).is_ok());
        // `equals` is an ordinary segment under this vocabulary
        assert_eq!(
            guard.check_where(&json!({"author": {"name": {"equals": "x"}}})),
            Err(GuardError::rejected("author.name"))
        );
    }
}
