//! Row types and shared queries for the `vote_relations` table.
use chrono::{DateTime, Utc};
use votes_tabulator_shared::types::{VoteRelation, VoteValue};

use crate::errors::RepositoryError;

pub(crate) const SELECT_RELATION: &str = r#"
    SELECT from_id, to_id, vote_type, count, created_at, updated_at
    FROM vote_relations
    WHERE from_id = $1 AND to_id = $2
"#;

pub(crate) const SELECT_RELATION_FOR_UPDATE: &str = r#"
    SELECT from_id, to_id, vote_type, count, created_at, updated_at
    FROM vote_relations
    WHERE from_id = $1 AND to_id = $2
    FOR UPDATE
"#;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct VoteRelationRow {
    from_id: String,
    to_id: String,
    vote_type: String,
    count: i64,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<VoteRelationRow> for VoteRelation {
    type Error = RepositoryError;

    fn try_from(row: VoteRelationRow) -> Result<Self, Self::Error> {
        let vote_type: VoteValue = row
            .vote_type
            .parse()
            .map_err(|_| RepositoryError::InvalidVoteType(row.vote_type.clone()))?;
        Ok(VoteRelation {
            from: row.from_id,
            to: row.to_id,
            vote_type,
            count: row.count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
