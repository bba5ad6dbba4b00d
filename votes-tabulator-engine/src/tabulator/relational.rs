//! Relational tabulation: one relation per voter, counters on the record,
//! both written in one exclusive transaction.
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};
use votes_tabulator_repository::{StoreTransaction, TransactionOptions, VoteStore};
use votes_tabulator_shared::types::{
    Fields, NewVoteRelation, RelationUpdate, RelationUpsert, TabulatedResult, VotePoints, VoteValue,
    VoteableId, VotesCount,
};

use super::Tabulate;
use crate::errors::TabulationError;

/// Tabulates with one vote relation per voter and counters on the record.
///
/// Each vote runs in one transaction holding the relation store and the
/// voteable's collection exclusively, so votes on the same collection are
/// serialized and a failure leaves neither the relation nor the counters changed.
pub struct RelationalTabulator {
    store: Arc<dyn VoteStore>,
    options: TransactionOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VotesDelta {
    upvotes: i64,
    downvotes: i64,
}

impl RelationalTabulator {
    pub fn new(store: Arc<dyn VoteStore>, options: TransactionOptions) -> Self {
        Self { store, options }
    }
}

/// Counter change implied by an upsert, or `None` when the vote repeats the
/// voter's current stance.
fn compute_vote_delta(upsert: &RelationUpsert) -> Option<VotesDelta> {
    let previous = upsert.old.as_ref().map(|relation| relation.vote_type);

    let (upvotes, downvotes) = match (previous, upsert.new.vote_type) {
        (None, VoteValue::Up) => (1, 0),
        (None, VoteValue::Down) => (0, 1),
        (Some(VoteValue::Down), VoteValue::Up) => (1, -1),
        (Some(VoteValue::Up), VoteValue::Down) => (-1, 1),
        (Some(_), _) => return None,
    };

    Some(VotesDelta { upvotes, downvotes })
}

fn to_result(voteable: &VoteableId, count: &VotesCount, points: &VotePoints) -> TabulatedResult {
    TabulatedResult {
        id: voteable.to_string(),
        up_count: count.upvotes,
        down_count: count.downvotes,
        score: count.score_or(points),
    }
}

fn read_count(voteable: &VoteableId, record: &Fields) -> Result<VotesCount, TabulationError> {
    VotesCount::from_fields(record).map_err(|e| TabulationError::MalformedRecord {
        id: voteable.to_string(),
        field: e.0,
    })
}

/// Body of the vote transaction: upsert the relation, then adjust counters.
async fn apply_vote(
    tx: &mut dyn StoreTransaction,
    voter_id: &str,
    voteable: &VoteableId,
    vote: VoteValue,
    points: &VotePoints,
) -> Result<TabulatedResult, TabulationError> {
    let now = Utc::now();
    let upsert = tx
        .upsert_by_from_to(
            voter_id,
            &voteable.to_string(),
            NewVoteRelation { vote_type: vote, created_at: now },
            RelationUpdate { vote_type: vote, updated_at: now },
        )
        .await?;

    let record = tx
        .get_record(voteable)
        .await?
        .ok_or_else(|| TabulationError::record_not_found(voteable))?;
    let stored = read_count(voteable, &record)?;

    let Some(delta) = compute_vote_delta(&upsert) else {
        return Ok(to_result(voteable, &stored, points));
    };

    let updated = stored.apply_delta(delta.upvotes, delta.downvotes, points);
    tx.update_record(voteable, updated.to_fields(points))
        .await?
        .ok_or_else(|| TabulationError::record_not_found(voteable))?;

    Ok(to_result(voteable, &updated, points))
}

#[async_trait]
impl Tabulate for RelationalTabulator {
    async fn cast_vote(
        &self,
        voter_id: &str,
        voteable: &VoteableId,
        vote: VoteValue,
        points: &VotePoints,
    ) -> Result<TabulatedResult, TabulationError> {
        let stores = [
            self.store.relation_store().to_string(),
            voteable.collection().to_string(),
        ];
        let mut tx = self.store.begin_exclusive(&stores, self.options).await?;

        match apply_vote(tx.as_mut(), voter_id, voteable, vote, points).await {
            Ok(result) => {
                tx.commit().await?;
                debug!(
                    voter_id,
                    voteable_id = %voteable,
                    vote = %vote,
                    up_count = result.up_count,
                    down_count = result.down_count,
                    "Relational vote committed"
                );
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(
                        voteable_id = %voteable,
                        error = %rollback_error,
                        "Rollback failed after aborted vote"
                    );
                }
                Err(e)
            }
        }
    }

    async fn tally(
        &self,
        voteable: &VoteableId,
        points: &VotePoints,
    ) -> Result<TabulatedResult, TabulationError> {
        let record = self
            .store
            .get_record(voteable)
            .await?
            .ok_or_else(|| TabulationError::record_not_found(voteable))?;
        Ok(to_result(voteable, &read_count(voteable, &record)?, points))
    }
}
