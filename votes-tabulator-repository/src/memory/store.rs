use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;
use tracing::debug;
use votes_tabulator_shared::types::{
    Fields, NewVoteRelation, RelationUpdate, RelationUpsert, VoteRelation, VoteValue, VoteableId,
    VoterLists,
};

use super::transaction::MemoryTransaction;
use crate::errors::RepositoryError;
use crate::interfaces::{
    RecordStore, RelationStore, StoreTransaction, TransactionOptions, TransactionScope,
};
use crate::DEFAULT_RELATION_STORE;

/// Committed contents of a [`MemoryVoteStore`].
#[derive(Debug, Default)]
pub(crate) struct MemoryState {
    pub(crate) records: HashMap<VoteableId, Fields>,
    pub(crate) relations: HashMap<(String, String), VoteRelation>,
}

pub(crate) type SharedState = Arc<Mutex<MemoryState>>;

pub(crate) fn lock_state(state: &SharedState) -> Result<MutexGuard<'_, MemoryState>, RepositoryError> {
    state
        .lock()
        .map_err(|e| RepositoryError::LockPoisoned(e.to_string()))
}

/// In-memory vote store with per-store exclusive locks and staged transactions.
pub struct MemoryVoteStore {
    state: SharedState,
    store_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
    relation_store: String,
    reject_commits: Arc<AtomicBool>,
}

impl MemoryVoteStore {
    /// Creates an empty store whose relation store is named `votes`.
    pub fn new() -> Self {
        Self::with_relation_store(DEFAULT_RELATION_STORE)
    }

    pub fn with_relation_store(relation_store: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            store_locks: Mutex::new(HashMap::new()),
            relation_store: relation_store.into(),
            reject_commits: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Inserts or replaces a whole record.
    pub fn insert_record(&self, id: VoteableId, fields: Fields) -> Result<(), RepositoryError> {
        lock_state(&self.state)?.records.insert(id, fields);
        Ok(())
    }

    /// Number of stored vote relations.
    pub fn relation_count(&self) -> Result<usize, RepositoryError> {
        Ok(lock_state(&self.state)?.relations.len())
    }

    /// Makes every later commit fail with `CommitRejected` until reset.
    ///
    /// Simulates an aborted store transaction.
    pub fn reject_commits(&self, reject: bool) {
        self.reject_commits.store(reject, Ordering::SeqCst);
    }

    fn store_lock(&self, name: &str) -> Result<Arc<tokio::sync::Mutex<()>>, RepositoryError> {
        let mut locks = self
            .store_locks
            .lock()
            .map_err(|e| RepositoryError::LockPoisoned(e.to_string()))?;
        Ok(locks.entry(name.to_string()).or_default().clone())
    }

    async fn lock_stores(&self, stores: &[String]) -> Result<Vec<OwnedMutexGuard<()>>, RepositoryError> {
        let mut names: Vec<&String> = stores.iter().collect();
        names.sort();
        names.dedup();

        let mut guards = Vec::with_capacity(names.len());
        for name in names {
            let lock = self.store_lock(name)?;
            guards.push(lock.lock_owned().await);
        }
        Ok(guards)
    }

    fn merge_record(&self, id: &VoteableId, fields: Fields) -> Result<Option<Fields>, RepositoryError> {
        let mut state = lock_state(&self.state)?;
        Ok(state.records.get_mut(id).map(|record| {
            record.extend(fields);
            record.clone()
        }))
    }

    fn apply_embedded_vote(
        &self,
        id: &VoteableId,
        voter_id: &str,
        vote: VoteValue,
    ) -> Result<Option<Fields>, RepositoryError> {
        let mut state = lock_state(&self.state)?;
        let Some(record) = state.records.get_mut(id) else {
            return Ok(None);
        };

        let mut lists = VoterLists::from_fields(record).map_err(|e| RepositoryError::MalformedRecord {
            id: id.to_string(),
            field: e.0,
        })?;
        if lists.cast(voter_id, vote) {
            record.extend(lists.to_fields());
        }
        Ok(Some(record.clone()))
    }
}

impl Default for MemoryVoteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryVoteStore {
    async fn get_record(&self, id: &VoteableId) -> Result<Option<Fields>, RepositoryError> {
        Ok(lock_state(&self.state)?.records.get(id).cloned())
    }

    async fn update_record(
        &self,
        id: &VoteableId,
        fields: Fields,
    ) -> Result<Option<Fields>, RepositoryError> {
        let _guards = self.lock_stores(&[id.collection().to_string()]).await?;
        self.merge_record(id, fields)
    }

    async fn cast_embedded_vote(
        &self,
        id: &VoteableId,
        voter_id: &str,
        vote: VoteValue,
    ) -> Result<Option<Fields>, RepositoryError> {
        let _guards = self.lock_stores(&[id.collection().to_string()]).await?;
        self.apply_embedded_vote(id, voter_id, vote)
    }
}

#[async_trait]
impl RelationStore for MemoryVoteStore {
    fn relation_store(&self) -> &str {
        &self.relation_store
    }

    async fn get_relation(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Option<VoteRelation>, RepositoryError> {
        let key = (from.to_string(), to.to_string());
        Ok(lock_state(&self.state)?.relations.get(&key).cloned())
    }

    async fn upsert_by_from_to(
        &self,
        from: &str,
        to: &str,
        insert: NewVoteRelation,
        update: RelationUpdate,
    ) -> Result<RelationUpsert, RepositoryError> {
        let stores = [self.relation_store.clone()];
        let mut tx = self.begin_exclusive(&stores, TransactionOptions::default()).await?;
        let result = tx.upsert_by_from_to(from, to, insert, update).await?;
        tx.commit().await?;
        Ok(result)
    }
}

#[async_trait]
impl TransactionScope for MemoryVoteStore {
    async fn begin_exclusive(
        &self,
        stores: &[String],
        options: TransactionOptions,
    ) -> Result<Box<dyn StoreTransaction>, RepositoryError> {
        let guards = self.lock_stores(stores).await?;
        debug!(stores = ?stores, wait_for_sync = options.wait_for_sync, "Began in-memory transaction");
        Ok(Box::new(MemoryTransaction::new(
            self.state.clone(),
            guards,
            self.reject_commits.load(Ordering::SeqCst),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use std::time::Duration;

    fn article(key: &str) -> VoteableId {
        VoteableId::new("articles", key)
    }

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    fn relation_args(vote: VoteValue) -> (NewVoteRelation, RelationUpdate) {
        let now = Utc::now();
        (
            NewVoteRelation { vote_type: vote, created_at: now },
            RelationUpdate { vote_type: vote, updated_at: now },
        )
    }

    #[tokio::test]
    async fn test_update_record_merges_fields() {
        let store = MemoryVoteStore::new();
        store
            .insert_record(article("1"), fields(json!({ "title": "article1" })))
            .unwrap();

        let updated = store
            .update_record(&article("1"), fields(json!({ "upCount": 1 })))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.get("title"), Some(&json!("article1")));
        assert_eq!(updated.get("upCount"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn test_update_missing_record_returns_none() {
        let store = MemoryVoteStore::new();
        let result = store
            .update_record(&article("missing"), fields(json!({ "upCount": 1 })))
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(store.get_record(&article("missing")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cast_embedded_vote_keeps_other_fields() {
        let store = MemoryVoteStore::new();
        store
            .insert_record(article("1"), fields(json!({ "title": "article1" })))
            .unwrap();

        store
            .cast_embedded_vote(&article("1"), "users/1", VoteValue::Up)
            .await
            .unwrap();
        let record = store
            .cast_embedded_vote(&article("1"), "users/1", VoteValue::Down)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(record.get("title"), Some(&json!("article1")));
        assert_eq!(record.get("upVoters"), Some(&json!([])));
        assert_eq!(record.get("downVoters"), Some(&json!(["users/1"])));
    }

    #[tokio::test]
    async fn test_cast_embedded_vote_rejects_malformed_list() {
        let store = MemoryVoteStore::new();
        store
            .insert_record(article("1"), fields(json!({ "upVoters": 3 })))
            .unwrap();

        let err = store
            .cast_embedded_vote(&article("1"), "users/1", VoteValue::Up)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::MalformedRecord { field: "upVoters", .. }));
    }

    #[tokio::test]
    async fn test_rollback_discards_staged_writes() {
        let store = MemoryVoteStore::new();
        store.insert_record(article("1"), Fields::new()).unwrap();
        let (insert, update) = relation_args(VoteValue::Up);

        let stores = vec!["votes".to_string(), "articles".to_string()];
        let mut tx = store.begin_exclusive(&stores, TransactionOptions::default()).await.unwrap();
        tx.upsert_by_from_to("users/1", "articles/1", insert, update).await.unwrap();
        tx.update_record(&article("1"), fields(json!({ "upCount": 1 }))).await.unwrap();

        // Staged writes are visible inside the transaction only.
        assert!(tx.get_relation("users/1", "articles/1").await.unwrap().is_some());
        assert_eq!(
            tx.get_record(&article("1")).await.unwrap().unwrap().get("upCount"),
            Some(&json!(1))
        );
        assert!(store.get_relation("users/1", "articles/1").await.unwrap().is_none());

        tx.rollback().await.unwrap();

        assert_eq!(store.relation_count().unwrap(), 0);
        assert_eq!(store.get_record(&article("1")).await.unwrap(), Some(Fields::new()));
    }

    #[tokio::test]
    async fn test_commit_applies_staged_writes() {
        let store = MemoryVoteStore::new();
        store.insert_record(article("1"), Fields::new()).unwrap();
        let (insert, update) = relation_args(VoteValue::Down);

        let stores = vec!["votes".to_string(), "articles".to_string()];
        let mut tx = store.begin_exclusive(&stores, TransactionOptions::default()).await.unwrap();
        tx.upsert_by_from_to("users/1", "articles/1", insert, update).await.unwrap();
        tx.update_record(&article("1"), fields(json!({ "downCount": 1 }))).await.unwrap();
        tx.commit().await.unwrap();

        let relation = store.get_relation("users/1", "articles/1").await.unwrap().unwrap();
        assert_eq!(relation.vote_type, VoteValue::Down);
        assert_eq!(
            store.get_record(&article("1")).await.unwrap().unwrap().get("downCount"),
            Some(&json!(1))
        );
    }

    #[tokio::test]
    async fn test_rejected_commit_leaves_no_effect() {
        let store = MemoryVoteStore::new();
        store.reject_commits(true);
        let (insert, update) = relation_args(VoteValue::Up);

        let err = store
            .upsert_by_from_to("users/1", "articles/1", insert, update)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::CommitRejected(_)));
        assert_eq!(store.relation_count().unwrap(), 0);

        store.reject_commits(false);
        let result = store
            .upsert_by_from_to("users/1", "articles/1", insert, update)
            .await
            .unwrap();
        assert!(result.is_new_vote());
    }

    #[tokio::test]
    async fn test_exclusive_transactions_serialize() {
        let store = Arc::new(MemoryVoteStore::new());
        let stores = vec!["votes".to_string()];
        let first = store.begin_exclusive(&stores, TransactionOptions::default()).await.unwrap();

        let contender = {
            let store = store.clone();
            let stores = stores.clone();
            tokio::spawn(async move {
                let tx = store.begin_exclusive(&stores, TransactionOptions::default()).await.unwrap();
                tx.commit().await.unwrap();
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        first.commit().await.unwrap();
        contender.await.unwrap();
    }
}
