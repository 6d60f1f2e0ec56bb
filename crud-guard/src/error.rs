//! Error types returned by the validators.

use std::fmt;

/// HTTP status used when a path is not in the allow-list.
const STATUS_FORBIDDEN: u16 = 403;

/// HTTP status used when the request envelope has the wrong shape.
const STATUS_BAD_REQUEST: u16 = 400;

/// Why a query was refused.
///
/// Validation is all-or-nothing: the first violation aborts the call and no
/// partial result is produced. Both variants describe caller input problems,
/// so retrying with the same input yields the same error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GuardError {
    /// A relation path implied by the query is not in the allow-list.
    RejectedPath {
        /// The stripped candidate relation path that was refused.
        path: String,
    },
    /// The request envelope does not have the expected shape.
    MalformedRequest {
        /// One entry per schema violation, in check order.
        details: Vec<String>,
    },
}

impl GuardError {
    pub(crate) fn rejected(path: impl Into<String>) -> Self {
        Self::RejectedPath { path: path.into() }
    }

    /// HTTP status a transport layer should answer with.
    ///
    /// ```
    /// use crud_guard::{JoinSet, validate_joins};
    ///
    /// let err = validate_joins(&["author"], &JoinSet::empty()).unwrap_err();
    /// assert_eq!(err.status_code(), 403);
    /// ```
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::RejectedPath { .. } => STATUS_FORBIDDEN,
            Self::MalformedRequest { .. } => STATUS_BAD_REQUEST,
        }
    }

    /// The refused path, if this is a [`GuardError::RejectedPath`].
    #[must_use]
    pub fn rejected_path(&self) -> Option<&str> {
        match self {
            Self::RejectedPath { path } => Some(path),
            Self::MalformedRequest { .. } => None,
        }
    }
}

impl fmt::Display for GuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RejectedPath { path } => write!(f, "join relation not allowed: {path}"),
            Self::MalformedRequest { details } => {
                write!(f, "query did not match schema: {}", details.join("; "))
            },
        }
    }
}

impl std::error::Error for GuardError {}
