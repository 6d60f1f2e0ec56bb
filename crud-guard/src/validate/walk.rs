//! Depth-first traversal of JSON trees with path reconstruction.

use crate::GuardError;
use crate::path::PATH_DELIMITER;
use serde_json::{Map, Value};

/// Shape of a tree node, as far as leaf detection cares.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Node<'a> {
    /// Null, boolean, number or string.
    Scalar,
    /// An array; children are addressed by index segments.
    Sequence(&'a [Value]),
    /// An object; children are addressed by their keys.
    Mapping(&'a Map<String, Value>),
}

impl<'a> Node<'a> {
    pub(crate) fn of(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Self::Sequence(items),
            Value::Object(map) => Self::Mapping(map),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Self::Scalar,
        }
    }
}

/// What the walker does after visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Visit {
    /// Visit the node's children.
    Descend,
    /// Do not look below this node.
    Skip,
}

/// Walk `value` depth-first, calling `visit` with the path of every node
/// (the root has the empty path). Mapping children are visited in insertion
/// order, sequence children by ascending index.
///
/// A mapping key containing the path delimiter contributes one segment per
/// part, so `{"a.b": x}` and `{"a": {"b": x}}` yield the same path.
///
/// Recursion depth equals tree depth; callers bound request nesting.
pub(crate) fn walk<F>(value: &Value, visit: &mut F) -> Result<(), GuardError>
where
    F: FnMut(&[String], Node<'_>) -> Result<Visit, GuardError>,
{
    let mut path = Vec::new();
    walk_node(value, &mut path, visit)
}

fn walk_node<F>(value: &Value, path: &mut Vec<String>, visit: &mut F) -> Result<(), GuardError>
where
    F: FnMut(&[String], Node<'_>) -> Result<Visit, GuardError>,
{
    let node = Node::of(value);
    if visit(path, node)? == Visit::Skip {
        return Ok(());
    }

    match node {
        Node::Scalar => {},
        Node::Sequence(items) => {
            for (index, child) in items.iter().enumerate() {
                path.push(index.to_string());
                walk_node(child, path, visit)?;
                path.pop();
            }
        },
        Node::Mapping(map) => {
            for (key, child) in map {
                let depth = path.len();
                path.extend(key.split(PATH_DELIMITER).map(String::from));
                walk_node(child, path, visit)?;
                path.truncate(depth);
            }
        },
    }
    Ok(())
}
