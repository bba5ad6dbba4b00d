use std::sync::Arc;

use tracing::info;
use votes_tabulator_engine::TabulatorHandle;
use votes_tabulator_repository::PostgresVoteStore;

use super::TabulatorConfig;
use crate::errors::TabulatorAppError;

/// `Dependencies` holds the store and the configured tabulator.
pub struct Dependencies {
    pub store: Arc<PostgresVoteStore>,
    pub tabulator: TabulatorHandle,
}

impl Dependencies {
    /// Connects to PostgreSQL and builds a tabulator from `config`.
    pub async fn new(config: &TabulatorConfig) -> Result<Self, TabulatorAppError> {
        info!(
            strategy = %config.policy.strategy(),
            up_point = config.policy.points().up,
            down_point = config.policy.points().down,
            relation_store = %config.relation_store,
            wait_for_sync = config.policy.transaction_options().wait_for_sync,
            "Initializing dependencies"
        );

        let pool = sqlx::PgPool::connect(&config.database_url).await?;
        let store = Arc::new(
            PostgresVoteStore::new(pool)
                .await?
                .with_relation_store(config.relation_store.clone()),
        );
        let tabulator = config.policy.build(store.clone());

        Ok(Self { store, tabulator })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;
    use votes_tabulator_engine::VotePolicy;

    #[tokio::test]
    async fn test_invalid_database_url() {
        let config = TabulatorConfig {
            database_url: "invalid-database-url".to_string(),
            policy: VotePolicy::default(),
            relation_store: "votes".to_string(),
            log_format: LogFormat::Pretty,
        };

        let result = Dependencies::new(&config).await;
        assert!(matches!(result, Err(TabulatorAppError::Database(_))));
    }
}
