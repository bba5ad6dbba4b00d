//! This module defines and re-exports the interfaces for the vote stores.
//! It serves as a central point for accessing traits related to data interaction.
mod record_store;
mod relation_store;
mod transaction;

pub use record_store::RecordStore;
pub use relation_store::RelationStore;
pub use transaction::{StoreTransaction, TransactionOptions, TransactionScope};

/// Everything a tabulator needs from a backing store.
pub trait VoteStore: RecordStore + RelationStore + TransactionScope {}

impl<T> VoteStore for T where T: RecordStore + RelationStore + TransactionScope {}
