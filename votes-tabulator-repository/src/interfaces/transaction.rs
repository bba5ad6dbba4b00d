//! This module defines the `TransactionScope` and `StoreTransaction` traits
//! used to run a vote with exclusive access to named stores.
use votes_tabulator_shared::types::{
    Fields, NewVoteRelation, RelationUpdate, RelationUpsert, VoteRelation, VoteableId,
};

use crate::errors::RepositoryError;

/// Options applied to an exclusive transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionOptions {
    /// Wait until the transaction is durably flushed before commit returns.
    pub wait_for_sync: bool,
}

/// Opens transactions holding exclusive write access to a set of stores.
#[async_trait::async_trait]
pub trait TransactionScope: Send + Sync {
    /// Begins a transaction and blocks until every named store is held exclusively.
    ///
    /// Stores are locked in a canonical order, so two transactions naming
    /// the same stores never deadlock on each other.
    async fn begin_exclusive(
        &self,
        stores: &[String],
        options: TransactionOptions,
    ) -> Result<Box<dyn StoreTransaction>, RepositoryError>;
}

/// An open all-or-nothing transaction.
///
/// Writes become visible to others only on `commit`. `rollback`, or dropping
/// the transaction without committing, discards them.
#[async_trait::async_trait]
pub trait StoreTransaction: Send {
    async fn get_record(&mut self, id: &VoteableId) -> Result<Option<Fields>, RepositoryError>;

    /// Merges `fields` into the record. Returns `Ok(None)` if the record is absent.
    async fn update_record(
        &mut self,
        id: &VoteableId,
        fields: Fields,
    ) -> Result<Option<Fields>, RepositoryError>;

    async fn get_relation(
        &mut self,
        from: &str,
        to: &str,
    ) -> Result<Option<VoteRelation>, RepositoryError>;

    async fn upsert_by_from_to(
        &mut self,
        from: &str,
        to: &str,
        insert: NewVoteRelation,
        update: RelationUpdate,
    ) -> Result<RelationUpsert, RepositoryError>;

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError>;
}
