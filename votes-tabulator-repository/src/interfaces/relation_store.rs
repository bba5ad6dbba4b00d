//! This module defines the `RelationStore` trait, the store of per-voter
//! vote relations.
use votes_tabulator_shared::types::{NewVoteRelation, RelationUpdate, RelationUpsert, VoteRelation};

use crate::errors::RepositoryError;

/// Store of vote relations, unique per `(from, to)`.
///
/// The tabulator writes relations through a [`StoreTransaction`](crate::StoreTransaction);
/// these standalone calls each run in their own short transaction.
#[async_trait::async_trait]
pub trait RelationStore: Send + Sync {
    /// Name of the relation store, used when locking it.
    fn relation_store(&self) -> &str;

    async fn get_relation(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Option<VoteRelation>, RepositoryError>;

    /// Inserts `insert` if no relation exists for `(from, to)`, otherwise
    /// applies `update` and increments the count. Returns prior and resulting state.
    async fn upsert_by_from_to(
        &self,
        from: &str,
        to: &str,
        insert: NewVoteRelation,
        update: RelationUpdate,
    ) -> Result<RelationUpsert, RepositoryError>;
}
