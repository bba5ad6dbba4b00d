//! PostgreSQL implementation of the record store, relation store and
//! transaction scope over a single `PgPool`.
use async_trait::async_trait;
use sqlx::types::Json;
use tracing::debug;
use votes_tabulator_shared::types::{
    Fields, NewVoteRelation, RelationUpdate, RelationUpsert, VoteRelation, VoteValue, VoteableId,
    VoterLists,
};

use super::rows::{VoteRelationRow, SELECT_RELATION};
use super::transaction::PostgresTransaction;
use crate::errors::RepositoryError;
use crate::interfaces::{
    RecordStore, RelationStore, StoreTransaction, TransactionOptions, TransactionScope,
};
use crate::DEFAULT_RELATION_STORE;

/// Appends the voter to one list unless present and drops it from the other,
/// in a single statement so concurrent voters serialize on the row lock.
/// Rows whose voter fields are not absent or arrays of strings are left untouched.
const CAST_EMBEDDED_VOTE: &str = r#"
    UPDATE voteable_documents
    SET body = body || jsonb_build_object(
        $3::text,
        CASE
            WHEN jsonb_typeof(body -> $3::text) = 'array'
                 AND (body -> $3::text) @> jsonb_build_array($5::text)
                THEN body -> $3::text
            WHEN jsonb_typeof(body -> $3::text) = 'array'
                THEN (body -> $3::text) || jsonb_build_array($5::text)
            ELSE jsonb_build_array($5::text)
        END,
        $4::text,
        CASE
            WHEN jsonb_typeof(body -> $4::text) = 'array'
                THEN COALESCE(
                    (SELECT jsonb_agg(voter ORDER BY position)
                     FROM jsonb_array_elements(body -> $4::text) WITH ORDINALITY AS t(voter, position)
                     WHERE voter <> to_jsonb($5::text)),
                    '[]'::jsonb)
            ELSE '[]'::jsonb
        END
    )
    WHERE collection = $1 AND key = $2
      AND COALESCE(jsonb_typeof(body -> $3::text), 'null') IN ('array', 'null')
      AND COALESCE(jsonb_typeof(body -> $4::text), 'null') IN ('array', 'null')
      AND NOT EXISTS (
          SELECT 1
          FROM jsonb_array_elements(
              CASE WHEN jsonb_typeof(body -> $3::text) = 'array' THEN body -> $3::text ELSE '[]'::jsonb END
          ) AS t(voter)
          WHERE jsonb_typeof(voter) <> 'string')
      AND NOT EXISTS (
          SELECT 1
          FROM jsonb_array_elements(
              CASE WHEN jsonb_typeof(body -> $4::text) = 'array' THEN body -> $4::text ELSE '[]'::jsonb END
          ) AS t(voter)
          WHERE jsonb_typeof(voter) <> 'string')
    RETURNING body
"#;

/// PostgreSQL-backed vote store.
///
/// Provides the record store, the relation store and exclusive transactions
/// over a single connection pool.
pub struct PostgresVoteStore {
    pool: sqlx::PgPool,
    relation_store: String,
}

impl PostgresVoteStore {
    /// Creates a new PostgreSQL vote store instance.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool with the voting schema
    ///
    /// # Returns
    ///
    /// * `Ok(PostgresVoteStore)` - Ready-to-use store instance
    /// * `Err(RepositoryError)` - Future validation errors (currently always succeeds)
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, RepositoryError> {
        Ok(Self {
            pool,
            relation_store: DEFAULT_RELATION_STORE.to_string(),
        })
    }

    /// Overrides the relation store name used as its lock key.
    pub fn with_relation_store(mut self, relation_store: impl Into<String>) -> Self {
        self.relation_store = relation_store.into();
        self
    }

    /// Applies the bundled schema migrations.
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PostgresVoteStore {
    async fn get_record(&self, id: &VoteableId) -> Result<Option<Fields>, RepositoryError> {
        let row: Option<(Json<Fields>,)> = sqlx::query_as(
            "SELECT body FROM voteable_documents WHERE collection = $1 AND key = $2",
        )
        .bind(id.collection())
        .bind(id.key())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(Json(body),)| body))
    }

    async fn update_record(
        &self,
        id: &VoteableId,
        fields: Fields,
    ) -> Result<Option<Fields>, RepositoryError> {
        let row: Option<(Json<Fields>,)> = sqlx::query_as(
            "UPDATE voteable_documents SET body = body || $3 WHERE collection = $1 AND key = $2 RETURNING body",
        )
        .bind(id.collection())
        .bind(id.key())
        .bind(Json(fields))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(Json(body),)| body))
    }

    async fn cast_embedded_vote(
        &self,
        id: &VoteableId,
        voter_id: &str,
        vote: VoteValue,
    ) -> Result<Option<Fields>, RepositoryError> {
        let row: Option<(Json<Fields>,)> = sqlx::query_as(CAST_EMBEDDED_VOTE)
            .bind(id.collection())
            .bind(id.key())
            .bind(vote.voters_field())
            .bind(vote.opposite().voters_field())
            .bind(voter_id)
            .fetch_optional(&self.pool)
            .await?;

        if let Some((Json(body),)) = row {
            return Ok(Some(body));
        }

        // Either the record is absent or one of its voter fields has the wrong type.
        match self.get_record(id).await? {
            None => Ok(None),
            Some(fields) => {
                let field = VoterLists::from_fields(&fields)
                    .err()
                    .map(|e| e.0)
                    .unwrap_or(vote.voters_field());
                Err(RepositoryError::MalformedRecord {
                    id: id.to_string(),
                    field,
                })
            }
        }
    }
}

#[async_trait]
impl RelationStore for PostgresVoteStore {
    fn relation_store(&self) -> &str {
        &self.relation_store
    }

    async fn get_relation(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Option<VoteRelation>, RepositoryError> {
        let row: Option<VoteRelationRow> = sqlx::query_as(SELECT_RELATION)
            .bind(from)
            .bind(to)
            .fetch_optional(&self.pool)
            .await?;

        row.map(VoteRelation::try_from).transpose()
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
impl TransactionScope for PostgresVoteStore {
    async fn begin_exclusive(
        &self,
        stores: &[String],
        options: TransactionOptions,
    ) -> Result<Box<dyn StoreTransaction>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let synchronous_commit = if options.wait_for_sync {
            "SET LOCAL synchronous_commit TO ON"
        } else {
            "SET LOCAL synchronous_commit TO OFF"
        };
        sqlx::query(synchronous_commit).execute(&mut *tx).await?;

        let mut names: Vec<&String> = stores.iter().collect();
        names.sort();
        names.dedup();
        for name in names {
            sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
                .bind(name.as_str())
                .execute(&mut *tx)
                .await?;
        }

        debug!(stores = ?stores, wait_for_sync = options.wait_for_sync, "Began exclusive transaction");
        Ok(Box::new(PostgresTransaction::new(tx)))
    }
}
