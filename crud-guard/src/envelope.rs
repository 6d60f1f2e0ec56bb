//! Shape check for the full query envelope.
//!
//! Before any relation path is inspected the request must look like:
//!
//! | Key        | Rule                                                   |
//! |------------|--------------------------------------------------------|
//! | `where`    | required object                                        |
//! | `joins`    | required array of non-empty strings                    |
//! | `select`   | required object with optional `only`/`except` arrays of non-empty strings |
//! | `orderBy`  | optional array of objects                              |
//! | `page`     | optional integer >= 1                                  |
//! | `pageSize` | optional integer >= 1                                  |
//!
//! Any other top-level key is refused. Violations are collected in the
//! order above and returned together as [`GuardError::MalformedRequest`].

use crate::GuardError;
use serde::Deserialize;
use serde_json::{Map, Value};

const KNOWN_KEYS: [&str; 6] = ["where", "joins", "select", "orderBy", "page", "pageSize"];
const SELECT_KEYS: [&str; 2] = ["only", "except"];

/// A query whose envelope passed [`validate_crud_query`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[non_exhaustive]
pub struct CrudQuery {
    /// The filter tree (`where`).
    #[serde(rename = "where")]
    pub filter: Value,
    /// Relations to load alongside the result.
    pub joins: Vec<String>,
    /// Field selection.
    pub select: Selection,
    /// Sort expressions, in priority order.
    #[serde(default)]
    pub order_by: Option<Vec<Value>>,
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<u64>,
    /// Items per page.
    #[serde(default)]
    pub page_size: Option<u64>,
}

impl CrudQuery {
    /// A query with the given filter, no joins and an empty selection.
    #[must_use]
    pub fn new(filter: Value) -> Self {
        Self {
            filter,
            joins: Vec::new(),
            select: Selection::default(),
            order_by: None,
            page: None,
            page_size: None,
        }
    }

    /// Add a requested join.
    #[must_use]
    pub fn join(mut self, path: impl Into<String>) -> Self {
        self.joins.push(path.into());
        self
    }

    /// Append a sort expression.
    #[must_use]
    pub fn sort_by(mut self, expression: Value) -> Self {
        self.order_by.get_or_insert_with(Vec::new).push(expression);
        self
    }

    /// Sort expressions, or an empty slice when none were given.
    #[must_use]
    pub fn sort_expressions(&self) -> &[Value] {
        self.order_by.as_deref().unwrap_or_default()
    }
}

/// Field selection of a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct Selection {
    /// Only return these fields.
    #[serde(default)]
    pub only: Option<Vec<String>>,
    /// Return every field except these.
    #[serde(default)]
    pub except: Option<Vec<String>>,
}

/// Check the envelope of a decoded query and convert it to a [`CrudQuery`].
///
/// ```
/// use crud_guard::validate_crud_query;
/// use serde_json::json;
///
/// let query = validate_crud_query(&json!({
///     "where": {"title": {"contains": "rust"}},
///     "joins": ["author"],
///     "select": {"only": ["id", "title"]},
///     "page": 2
/// }))
/// .unwrap();
/// assert_eq!(query.joins, vec!["author"]);
/// assert_eq!(query.page, Some(2));
///
/// let err = validate_crud_query(&json!({"joins": []})).unwrap_err();
/// assert_eq!(err.status_code(), 400);
/// ```
pub fn validate_crud_query(query: &Value) -> Result<CrudQuery, GuardError> {
    let details = envelope_violations(query);
    if !details.is_empty() {
        tracing::warn!(violations = details.len(), "query did not match schema");
        return Err(GuardError::MalformedRequest { details });
    }

    serde_json::from_value(query.clone()).map_err(|e| GuardError::MalformedRequest {
        details: vec![e.to_string()],
    })
}

fn envelope_violations(query: &Value) -> Vec<String> {
    let Some(map) = query.as_object() else {
        return vec!["query must be an object".to_string()];
    };

    let mut details = Vec::new();

    match map.get("where") {
        None => details.push("`where` is required".to_string()),
        Some(value) if !value.is_object() => details.push("`where` must be an object".to_string()),
        Some(_) => {},
    }

    match map.get("joins") {
        None => details.push("`joins` is required".to_string()),
        Some(value) => check_string_array(value, "joins", &mut details),
    }

    match map.get("select") {
        None => details.push("`select` is required".to_string()),
        Some(Value::Object(select)) => check_select(select, &mut details),
        Some(_) => details.push("`select` must be an object".to_string()),
    }

    match map.get("orderBy") {
        None => {},
        Some(Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                if !item.is_object() {
                    details.push(format!("`orderBy[{i}]` must be an object"));
                }
            }
        },
        Some(_) => details.push("`orderBy` must be an array".to_string()),
    }

    for key in ["page", "pageSize"] {
        if let Some(value) = map.get(key)
            && !value.as_u64().is_some_and(|n| n >= 1)
        {
            details.push(format!("`{key}` must be an integer >= 1"));
        }
    }

    for key in map.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            details.push(format!("`{key}` is not allowed"));
        }
    }

    details
}

fn check_select(select: &Map<String, Value>, details: &mut Vec<String>) {
    for (key, value) in select {
        if SELECT_KEYS.contains(&key.as_str()) {
            check_string_array(value, &format!("select.{key}"), details);
        } else {
            details.push(format!("`select.{key}` is not allowed"));
        }
    }
}

fn check_string_array(value: &Value, name: &str, details: &mut Vec<String>) {
    let Some(items) = value.as_array() else {
        details.push(format!("`{name}` must be an array"));
        return;
    };
    for (i, item) in items.iter().enumerate() {
        match item.as_str() {
            None => details.push(format!("`{name}[{i}]` must be a string")),
            Some("") => details.push(format!("`{name}[{i}]` must not be empty")),
            Some(_) => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn details(query: &Value) -> Vec<String> {
        match validate_crud_query(query) {
            Err(GuardError::MalformedRequest { details }) => details,
            other => panic!("expected MalformedRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_minimal_query() {
        let query = validate_crud_query(&json!({"where": {}, "joins": [], "select": {}})).unwrap();
        assert_eq!(query.filter, json!({}));
        assert!(query.joins.is_empty());
        assert_eq!(query.select, Selection::default());
        assert!(query.sort_expressions().is_empty());
        assert_eq!(query.page, None);
        assert_eq!(query.page_size, None);
    }

    #[test]
    fn test_full_query() {
        let query = validate_crud_query(&json!({
            "where": {"author": {"name": {"equals": "Ann"}}},
            "joins": ["author", "author.profile"],
            "select": {"only": ["id"], "except": ["secret"]},
            "orderBy": [{"createdAt": "desc"}],
            "page": 1,
            "pageSize": 50
        }))
        .unwrap();
        assert_eq!(query.joins.len(), 2);
        assert_eq!(query.select.only, Some(vec!["id".to_string()]));
        assert_eq!(query.select.except, Some(vec!["secret".to_string()]));
        assert_eq!(query.sort_expressions(), &[json!({"createdAt": "desc"})]);
        assert_eq!(query.page_size, Some(50));
    }

    #[test]
    fn test_missing_required_keys() {
        assert_eq!(
            details(&json!({})),
            vec![
                "`where` is required",
                "`joins` is required",
                "`select` is required"
            ]
        );
    }

    #[test]
    fn test_non_object_query() {
        assert_eq!(details(&json!([1, 2])), vec!["query must be an object"]);
        assert_eq!(details(&Value::Null), vec!["query must be an object"]);
    }

    #[test]
    fn test_wrong_types() {
        let found = details(&json!({
            "where": [],
            "joins": ["author", 3],
            "select": {"only": "id", "fields": []},
            "orderBy": [{"id": "asc"}, "title"]
        }));
        assert_eq!(
            found,
            vec![
                "`where` must be an object",
                "`joins[1]` must be a string",
                "`select.only` must be an array",
                "`select.fields` is not allowed",
                "`orderBy[1]` must be an object",
            ]
        );
    }

    #[test]
    fn test_empty_strings_are_malformed() {
        let found = details(&json!({
            "where": {},
            "joins": ["author", ""],
            "select": {"only": [""], "except": ["secret"]}
        }));
        assert_eq!(
            found,
            vec!["`joins[1]` must not be empty", "`select.only[0]` must not be empty"]
        );
    }

    #[test]
    fn test_page_bounds() {
        let base = |page: Value| json!({"where": {}, "joins": [], "select": {}, "page": page});
        assert!(validate_crud_query(&base(json!(1))).is_ok());
        assert_eq!(details(&base(json!(0))), vec!["`page` must be an integer >= 1"]);
        assert_eq!(details(&base(json!(-3))), vec!["`page` must be an integer >= 1"]);
        assert_eq!(details(&base(json!(1.5))), vec!["`page` must be an integer >= 1"]);
        assert_eq!(details(&base(json!("2"))), vec!["`page` must be an integer >= 1"]);
    }

    #[test]
    fn test_unknown_top_level_key() {
        let found = details(&json!({"where": {}, "joins": [], "select": {}, "limit": 10}));
        assert_eq!(found, vec!["`limit` is not allowed"]);
    }

    #[test]
    fn test_builder() {
        let query = CrudQuery::new(json!({"id": 1}))
            .join("author")
            .sort_by(json!({"id": "asc"}));
        assert_eq!(query.joins, vec!["author"]);
        assert_eq!(query.sort_expressions().len(), 1);
    }
}
