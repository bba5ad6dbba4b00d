use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::VoteValue;

/// A voter's current stance on one voteable (relational mode).
///
/// Unique per `(from, to)`. Created on the first vote, mutated in place on
/// every later vote and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRelation {
    /// Voter id.
    pub from: String,
    /// Voteable id in `"<collection>/<key>"` form.
    pub to: String,
    #[serde(rename = "type")]
    pub vote_type: VoteValue,
    /// Total vote events, informational only.
    pub count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Values written when no relation exists yet for `(from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewVoteRelation {
    pub vote_type: VoteValue,
    pub created_at: DateTime<Utc>,
}

/// Values written over an existing relation. `count` is always incremented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationUpdate {
    pub vote_type: VoteValue,
    pub updated_at: DateTime<Utc>,
}

/// Prior and resulting relation state of a single upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationUpsert {
    pub old: Option<VoteRelation>,
    pub new: VoteRelation,
}

impl RelationUpsert {
    /// Computes the upsert outcome for `(from, to)` given the stored relation.
    pub fn resolve(
        from: &str,
        to: &str,
        old: Option<VoteRelation>,
        insert: NewVoteRelation,
        update: RelationUpdate,
    ) -> Self {
        let new = match &old {
            None => VoteRelation {
                from: from.to_string(),
                to: to.to_string(),
                vote_type: insert.vote_type,
                count: 1,
                created_at: insert.created_at,
                updated_at: None,
            },
            Some(existing) => VoteRelation {
                vote_type: update.vote_type,
                count: existing.count + 1,
                updated_at: Some(update.updated_at),
                ..existing.clone()
            },
        };
        Self { old, new }
    }

    /// No relation existed before this upsert.
    pub fn is_new_vote(&self) -> bool {
        self.old.is_none()
    }

    /// A relation existed and already carried the same vote type.
    pub fn is_same_vote(&self) -> bool {
        self.old
            .as_ref()
            .is_some_and(|old| old.vote_type == self.new.vote_type)
    }
}
