//! Identifier resolution for voteable records.
//!
//! A voteable id has the form `"<collection>/<key>"`. The collection names the
//! store the record lives in and, for the relational strategy, the store that
//! has to be locked alongside the relation store.
use votes_tabulator_shared::types::VoteableId;

use crate::errors::TabulationError;

const SEPARATOR: char = '/';

/// Returns the collection segment of a composite voteable id.
///
/// # Errors
///
/// `InvalidIdentifier` if the id has no separator or either segment is empty.
pub fn resolve_collection(voteable_id: &str) -> Result<&str, TabulationError> {
    split(voteable_id).map(|(collection, _)| collection)
}

/// Parses a composite voteable id into its collection and key.
pub fn resolve(voteable_id: &str) -> Result<VoteableId, TabulationError> {
    let (collection, key) = split(voteable_id)?;
    Ok(VoteableId::new(collection, key))
}

/// Voter ids are opaque but must not be empty.
pub fn validate_voter_id(voter_id: &str) -> Result<(), TabulationError> {
    if voter_id.trim().is_empty() {
        return Err(TabulationError::invalid_identifier("voter id must not be empty"));
    }
    Ok(())
}

fn split(voteable_id: &str) -> Result<(&str, &str), TabulationError> {
    match voteable_id.split_once(SEPARATOR) {
        Some((collection, key)) if !collection.is_empty() && !key.is_empty() => Ok((collection, key)),
        _ => Err(TabulationError::invalid_identifier(format!(
            "expected \"<collection>/<key>\", got {voteable_id:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_collection() {
        assert_eq!(resolve_collection("articles/1234").unwrap(), "articles");
        assert_eq!(resolve_collection("comments/a/b").unwrap(), "comments");
    }

    #[test]
    fn test_resolve_keeps_key_after_first_separator() {
        let id = resolve("comments/a/b").unwrap();
        assert_eq!(id.collection(), "comments");
        assert_eq!(id.key(), "a/b");
        assert_eq!(id.to_string(), "comments/a/b");
    }

    #[test]
    fn test_resolve_rejects_malformed_ids() {
        for bad in ["articles", "", "/1234", "articles/"] {
            assert!(
                matches!(resolve_collection(bad), Err(TabulationError::InvalidIdentifier(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_voter_id() {
        assert!(validate_voter_id("users/1").is_ok());
        assert!(matches!(
            validate_voter_id("  "),
            Err(TabulationError::InvalidIdentifier(_))
        ));
    }
}
