//! PostgreSQL implementation of `StoreTransaction`.
//!
//! Runs inside one database transaction; relation reads taken for an upsert
//! lock the row with `FOR UPDATE`.
use async_trait::async_trait;
use sqlx::types::Json;
use votes_tabulator_shared::types::{
    Fields, NewVoteRelation, RelationUpdate, RelationUpsert, VoteRelation, VoteableId,
};

use super::rows::{VoteRelationRow, SELECT_RELATION, SELECT_RELATION_FOR_UPDATE};
use crate::errors::RepositoryError;
use crate::interfaces::StoreTransaction;

/// An open PostgreSQL transaction holding advisory locks on its stores.
///
/// Dropping it without calling `commit` rolls it back.
pub struct PostgresTransaction {
    tx: sqlx::Transaction<'static, sqlx::Postgres>,
}

impl PostgresTransaction {
    pub(crate) fn new(tx: sqlx::Transaction<'static, sqlx::Postgres>) -> Self {
        Self { tx }
    }

    async fn fetch_relation(
        &mut self,
        query: &'static str,
        from: &str,
        to: &str,
    ) -> Result<Option<VoteRelation>, RepositoryError> {
        let row: Option<VoteRelationRow> = sqlx::query_as(query)
            .bind(from)
            .bind(to)
            .fetch_optional(&mut *self.tx)
            .await?;

        row.map(VoteRelation::try_from).transpose()
    }
}

#[async_trait]
impl StoreTransaction for PostgresTransaction {
    async fn get_record(&mut self, id: &VoteableId) -> Result<Option<Fields>, RepositoryError> {
        let row: Option<(Json<Fields>,)> = sqlx::query_as(
            "SELECT body FROM voteable_documents WHERE collection = $1 AND key = $2 FOR UPDATE",
        )
        .bind(id.collection())
        .bind(id.key())
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(|(Json(body),)| body))
    }

    async fn update_record(
        &mut self,
        id: &VoteableId,
        fields: Fields,
    ) -> Result<Option<Fields>, RepositoryError> {
        let row: Option<(Json<Fields>,)> = sqlx::query_as(
            "UPDATE voteable_documents SET body = body || $3 WHERE collection = $1 AND key = $2 RETURNING body",
        )
        .bind(id.collection())
        .bind(id.key())
        .bind(Json(fields))
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(|(Json(body),)| body))
    }

    async fn get_relation(
        &mut self,
        from: &str,
        to: &str,
    ) -> Result<Option<VoteRelation>, RepositoryError> {
        self.fetch_relation(SELECT_RELATION, from, to).await
    }

    async fn upsert_by_from_to(
        &mut self,
        from: &str,
        to: &str,
        insert: NewVoteRelation,
        update: RelationUpdate,
    ) -> Result<RelationUpsert, RepositoryError> {
        let old = self.fetch_relation(SELECT_RELATION_FOR_UPDATE, from, to).await?;
        let result = RelationUpsert::resolve(from, to, old, insert, update);

        if result.is_new_vote() {
            sqlx::query(
                r#"
                INSERT INTO vote_relations (from_id, to_id, vote_type, count, created_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(from)
            .bind(to)
            .bind(result.new.vote_type.as_str())
            .bind(result.new.count)
            .bind(result.new.created_at)
            .execute(&mut *self.tx)
            .await?;
        } else {
            sqlx::query(
                r#"
                UPDATE vote_relations
                SET vote_type = $3, count = $4, updated_at = $5
                WHERE from_id = $1 AND to_id = $2
                "#,
            )
            .bind(from)
            .bind(to)
            .bind(result.new.vote_type.as_str())
            .bind(result.new.count)
            .bind(result.new.updated_at)
            .execute(&mut *self.tx)
            .await?;
        }

        Ok(result)
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
