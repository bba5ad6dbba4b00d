//! Error types for the votes tabulator binary.
//! Consolidates configuration, database, repository and tabulation errors.
use votes_tabulator_engine::TabulationError;
use votes_tabulator_repository::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum TabulatorAppError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("Tabulation error: {0}")]
    Tabulation(#[from] TabulationError),
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl TabulatorAppError {
    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
