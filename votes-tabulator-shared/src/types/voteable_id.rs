use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite identifier of a voteable record: `"<collection>/<key>"`.
///
/// Construction does not validate; parsing from the string form lives in the
/// engine's identifier resolver.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoteableId {
    collection: String,
    key: String,
}

impl VoteableId {
    pub fn new(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            key: key.into(),
        }
    }

    /// The owning collection, used to pick the store and its lock.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for VoteableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.key)
    }
}
