//! Error types raised while casting or reading votes.
//! Validation errors are raised before any store access; store failures
//! arrive as `TransactionFailure` after the store has rolled back.
use thiserror::Error;
use votes_tabulator_repository::RepositoryError;
use votes_tabulator_shared::types::InvalidVoteType;

/// Represents errors that can occur within the tabulation engine.
#[derive(Debug, Error)]
pub enum TabulationError {
    #[error("Invalid vote type: {0}")]
    InvalidVoteType(#[from] InvalidVoteType),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Record {id} has a malformed {field} field")]
    MalformedRecord { id: String, field: &'static str },

    #[error("Transaction failure: {0}")]
    TransactionFailure(RepositoryError),
}

impl TabulationError {
    /// Create an invalid identifier error.
    pub fn invalid_identifier(msg: impl Into<String>) -> Self {
        Self::InvalidIdentifier(msg.into())
    }

    /// Create an invalid config error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a record not found error.
    pub fn record_not_found(id: impl ToString) -> Self {
        Self::RecordNotFound(id.to_string())
    }
}

impl From<RepositoryError> for TabulationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::MalformedRecord { id, field } => Self::MalformedRecord { id, field },
            other => Self::TransactionFailure(other),
        }
    }
}
