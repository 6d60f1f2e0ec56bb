//! Validation of the flat `joins` list.

use crate::{GuardError, JoinSet};

/// Check that every requested join is listed verbatim in `allowed`.
///
/// Requested joins are already pure relation paths, so nothing is stripped.
/// The first refused entry, in request order, is reported.
///
/// ```
/// use crud_guard::{JoinSet, validate_joins};
///
/// let allowed = JoinSet::new(["author"]);
/// let err = validate_joins(&["author", "author.posts"], &allowed).unwrap_err();
/// assert_eq!(err.rejected_path(), Some("author.posts"));
/// ```
pub fn validate_joins<S: AsRef<str>>(requested: &[S], allowed: &JoinSet) -> Result<(), GuardError> {
    for join in requested {
        let join = join.as_ref();
        if !allowed.contains(join) {
            tracing::warn!(path = join, kind = "joins", "join relation not allowed");
            return Err(GuardError::rejected(join));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_allowed() {
        let allowed = JoinSet::new(["author", "author.posts"]);
        assert!(validate_joins(&["author", "author.posts"], &allowed).is_ok());
        assert!(validate_joins::<&str>(&[], &JoinSet::empty()).is_ok());
    }

    #[test]
    fn test_first_unlisted_is_reported() {
        let allowed = JoinSet::new(["author"]);
        let requested = vec!["editor".to_string(), "reviewer".to_string()];
        let err = validate_joins(requested.as_slice(), &allowed).unwrap_err();
        assert_eq!(err, GuardError::rejected("editor"));
    }

    #[test]
    fn test_empty_join_is_not_implied() {
        // unlike tree leaves, an empty requested join is a plain entry
        let err = validate_joins(&[""], &JoinSet::empty()).unwrap_err();
        assert_eq!(err.rejected_path(), Some(""));
    }
}
