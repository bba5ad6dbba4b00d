//! Error types for the votes tabulator repository.
//! Defines specific errors that can occur during store operations.
use thiserror::Error;

/// Represents errors that can occur within a vote store.
///
/// Any of these aborts the surrounding transaction; the engine surfaces them
/// to the caller as a transaction failure.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid vote type: {0}")]
    InvalidVoteType(String),

    #[error("Store lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Commit rejected: {0}")]
    CommitRejected(String),

    #[error("Record {id} has a malformed {field} field")]
    MalformedRecord { id: String, field: &'static str },
}
