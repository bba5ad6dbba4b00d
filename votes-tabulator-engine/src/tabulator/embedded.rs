//! Embedded tabulation: voter lists on the voteable record.
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use votes_tabulator_repository::VoteStore;
use votes_tabulator_shared::types::{
    Fields, TabulatedResult, VotePoints, VoteValue, VoteableId, VoterLists,
};

use super::Tabulate;
use crate::errors::TabulationError;

/// Tabulates from voter lists kept on the voteable record.
///
/// Counts are derived from list lengths at read time; nothing but the two
/// lists is ever written.
pub struct EmbeddedTabulator {
    store: Arc<dyn VoteStore>,
}

impl EmbeddedTabulator {
    pub fn new(store: Arc<dyn VoteStore>) -> Self {
        Self { store }
    }
}

fn tabulate(
    voteable: &VoteableId,
    record: &Fields,
    points: &VotePoints,
) -> Result<TabulatedResult, TabulationError> {
    let lists = VoterLists::from_fields(record).map_err(|e| TabulationError::MalformedRecord {
        id: voteable.to_string(),
        field: e.0,
    })?;
    let (up_count, down_count) = (lists.up_count(), lists.down_count());
    Ok(TabulatedResult {
        id: voteable.to_string(),
        up_count,
        down_count,
        score: points.score(up_count, down_count),
    })
}

#[async_trait]
impl Tabulate for EmbeddedTabulator {
    async fn cast_vote(
        &self,
        voter_id: &str,
        voteable: &VoteableId,
        vote: VoteValue,
        points: &VotePoints,
    ) -> Result<TabulatedResult, TabulationError> {
        let record = self
            .store
            .cast_embedded_vote(voteable, voter_id, vote)
            .await?
            .ok_or_else(|| TabulationError::record_not_found(voteable))?;

        let result = tabulate(voteable, &record, points)?;
        debug!(
            voter_id,
            voteable_id = %voteable,
            vote = %vote,
            up_count = result.up_count,
            down_count = result.down_count,
            "Embedded vote applied"
        );
        Ok(result)
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
        tabulate(voteable, &record, points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use votes_tabulator_repository::{MemoryVoteStore, RecordStore};

    fn setup() -> (Arc<MemoryVoteStore>, EmbeddedTabulator, VoteableId) {
        let store = Arc::new(MemoryVoteStore::new());
        let id = VoteableId::new("articles", "a1");
        store
            .insert_record(id.clone(), json!({ "title": "article1" }).as_object().cloned().unwrap())
            .unwrap();
        let tabulator = EmbeddedTabulator::new(store.clone());
        (store, tabulator, id)
    }

    #[tokio::test]
    async fn test_first_up_vote() {
        let (_, tabulator, id) = setup();
        let result = tabulator
            .cast_vote("users/u1", &id, VoteValue::Up, &VotePoints::default())
            .await
            .unwrap();
        assert_eq!(
            result,
            TabulatedResult { id: "articles/a1".to_string(), up_count: 1, down_count: 0, score: 1.0 }
        );
    }

    #[tokio::test]
    async fn test_repeated_vote_is_noop() {
        let (store, tabulator, id) = setup();
        let points = VotePoints::default();
        let first = tabulator.cast_vote("users/u1", &id, VoteValue::Down, &points).await.unwrap();
        let second = tabulator.cast_vote("users/u1", &id, VoteValue::Down, &points).await.unwrap();
        assert_eq!(first, second);

        let record = store.get_record(&id).await.unwrap().unwrap();
        assert_eq!(record.get("downVoters"), Some(&json!(["users/u1"])));
    }

    #[tokio::test]
    async fn test_switch_keeps_unrelated_fields() {
        let (store, tabulator, id) = setup();
        let points = VotePoints::default();
        tabulator.cast_vote("users/u1", &id, VoteValue::Up, &points).await.unwrap();
        let result = tabulator.cast_vote("users/u1", &id, VoteValue::Down, &points).await.unwrap();
        assert_eq!((result.up_count, result.down_count, result.score), (0, 1, -1.0));

        let record = store.get_record(&id).await.unwrap().unwrap();
        assert_eq!(record.get("title"), Some(&json!("article1")));
        assert!(record.get("upCount").is_none());
    }

    #[tokio::test]
    async fn test_missing_record() {
        let (_, tabulator, _) = setup();
        let missing = VoteableId::new("articles", "missing");
        let err = tabulator
            .cast_vote("users/u1", &missing, VoteValue::Up, &VotePoints::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TabulationError::RecordNotFound(id) if id == "articles/missing"));
    }

    #[tokio::test]
    async fn test_malformed_list() {
        let (store, tabulator, _) = setup();
        let broken = VoteableId::new("articles", "broken");
        store
            .insert_record(broken.clone(), json!({ "upVoters": {} }).as_object().cloned().unwrap())
            .unwrap();
        let err = tabulator
            .cast_vote("users/u1", &broken, VoteValue::Up, &VotePoints::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TabulationError::MalformedRecord { field: "upVoters", .. }));
    }

    #[tokio::test]
    async fn test_tally_reads_lists() {
        let (_, tabulator, id) = setup();
        let points = VotePoints::new(2.0, -1.0);
        assert_eq!(tabulator.tally(&id, &points).await.unwrap().score, 0.0);
        tabulator.cast_vote("users/u1", &id, VoteValue::Up, &points).await.unwrap();
        tabulator.cast_vote("users/u2", &id, VoteValue::Up, &points).await.unwrap();
        tabulator.cast_vote("users/u3", &id, VoteValue::Down, &points).await.unwrap();
        let tally = tabulator.tally(&id, &points).await.unwrap();
        assert_eq!((tally.up_count, tally.down_count, tally.score), (2, 1, 3.0));
    }
}
