//! # Votes Tabulator Repository
//! This crate provides the store abstractions the tabulation engine runs
//! against: a keyed record store, a relation store and a transaction scope
//! granting exclusive write access to named stores. It includes a PostgreSQL
//! implementation and an in-memory implementation.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::RepositoryError;
pub use interfaces::{
    RecordStore, RelationStore, StoreTransaction, TransactionOptions, TransactionScope, VoteStore,
};
pub use memory::MemoryVoteStore;
pub use postgres::PostgresVoteStore;

/// Default name of the relation store, also used as its lock name.
pub const DEFAULT_RELATION_STORE: &str = "votes";
