use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;
use votes_tabulator_shared::types::{
    Fields, NewVoteRelation, RelationUpdate, RelationUpsert, VoteRelation, VoteableId,
};

use super::store::{lock_state, SharedState};
use crate::errors::RepositoryError;
use crate::interfaces::StoreTransaction;

/// A transaction over a [`MemoryVoteStore`](super::MemoryVoteStore).
///
/// Holds the locks of its stores for its whole lifetime. Reads see staged
/// writes first, then committed state.
pub(crate) struct MemoryTransaction {
    state: SharedState,
    _guards: Vec<OwnedMutexGuard<()>>,
    records: HashMap<VoteableId, Fields>,
    relations: HashMap<(String, String), VoteRelation>,
    reject_commit: bool,
}

impl MemoryTransaction {
    pub(crate) fn new(state: SharedState, guards: Vec<OwnedMutexGuard<()>>, reject_commit: bool) -> Self {
        Self {
            state,
            _guards: guards,
            records: HashMap::new(),
            relations: HashMap::new(),
            reject_commit,
        }
    }

    fn read_record(&self, id: &VoteableId) -> Result<Option<Fields>, RepositoryError> {
        if let Some(staged) = self.records.get(id) {
            return Ok(Some(staged.clone()));
        }
        Ok(lock_state(&self.state)?.records.get(id).cloned())
    }

    fn read_relation(&self, key: &(String, String)) -> Result<Option<VoteRelation>, RepositoryError> {
        if let Some(staged) = self.relations.get(key) {
            return Ok(Some(staged.clone()));
        }
        Ok(lock_state(&self.state)?.relations.get(key).cloned())
    }

    fn apply(self) -> Result<(), RepositoryError> {
        let mut state = lock_state(&self.state)?;
        state.records.extend(self.records);
        state.relations.extend(self.relations);
        Ok(())
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn get_record(&mut self, id: &VoteableId) -> Result<Option<Fields>, RepositoryError> {
        self.read_record(id)
    }

    async fn update_record(
        &mut self,
        id: &VoteableId,
        fields: Fields,
    ) -> Result<Option<Fields>, RepositoryError> {
        let Some(mut record) = self.read_record(id)? else {
            return Ok(None);
        };
        record.extend(fields);
        self.records.insert(id.clone(), record.clone());
        Ok(Some(record))
    }

    async fn get_relation(
        &mut self,
        from: &str,
        to: &str,
    ) -> Result<Option<VoteRelation>, RepositoryError> {
        self.read_relation(&(from.to_string(), to.to_string()))
    }

    async fn upsert_by_from_to(
        &mut self,
        from: &str,
        to: &str,
        insert: NewVoteRelation,
        update: RelationUpdate,
    ) -> Result<RelationUpsert, RepositoryError> {
        let key = (from.to_string(), to.to_string());
        let old = self.read_relation(&key)?;
        let result = RelationUpsert::resolve(from, to, old, insert, update);
        self.relations.insert(key, result.new.clone());
        Ok(result)
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        if self.reject_commit {
            return Err(RepositoryError::CommitRejected(
                "store configured to reject commits".to_string(),
            ));
        }
        self.apply()
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        Ok(())
    }
}
