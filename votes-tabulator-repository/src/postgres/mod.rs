//! PostgreSQL implementation of the vote stores.
//!
//! ## Database Tables
//!
//! - `voteable_documents`: voteable records as `(collection, key, body JSONB)`
//! - `vote_relations`: one row per `(from_id, to_id)` carrying the voter's stance
//!
//! Exclusive access to a named store inside a transaction is taken with a
//! transaction-scoped advisory lock keyed on the store name.
mod rows;
mod transaction;
mod vote_store;

pub use transaction::PostgresTransaction;
pub use vote_store::PostgresVoteStore;
