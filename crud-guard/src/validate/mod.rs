//! Relation-path validators for the three parts of a query.
//!
//! - [`validate_nested_where`]: filter trees, with operator keyword stripping
//! - [`validate_nested_order_by`]: sort expressions, final segment only
//! - [`validate_joins`]: the flat list of requested relations
//!
//! All three take the same [`JoinSet`](crate::JoinSet), stop at the first
//! refused path and report it as [`GuardError::RejectedPath`](crate::GuardError::RejectedPath).
//! They are pure functions over borrowed input and may run concurrently.

mod joins;
mod order_by;
mod walk;
mod where_tree;

pub use joins::validate_joins;
pub use order_by::validate_nested_order_by;
pub use where_tree::{validate_nested_where, validate_nested_where_with};
