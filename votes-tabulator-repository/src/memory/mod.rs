//! In-memory implementation of the vote stores.
//!
//! Each named store (a record collection or the relation store) has its own
//! async lock. Transactions hold the locks of the stores they name until they
//! finish and stage their writes, applying them only on commit. Useful for
//! tests and for embedding the tabulator without a database.
mod store;
mod transaction;

pub use store::MemoryVoteStore;
