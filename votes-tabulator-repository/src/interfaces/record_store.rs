//! This module defines the `RecordStore` trait, the keyed store holding
//! voteable records.
use votes_tabulator_shared::types::{Fields, VoteValue, VoteableId};

use crate::errors::RepositoryError;

/// A keyed store of voteable records.
///
/// Every call is atomic on its own. Records are open JSON objects; updates
/// merge the given fields and leave all other fields untouched.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetches a record by id.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(fields))` - The record's current fields
    /// * `Ok(None)` - No record with this id exists
    async fn get_record(&self, id: &VoteableId) -> Result<Option<Fields>, RepositoryError>;

    /// Merges `fields` into an existing record and returns the updated record.
    ///
    /// Returns `Ok(None)` without writing anything if the record is absent.
    async fn update_record(
        &self,
        id: &VoteableId,
        fields: Fields,
    ) -> Result<Option<Fields>, RepositoryError>;

    /// Applies an embedded vote as one atomic document update.
    ///
    /// Appends `voter_id` to the voter list for `vote` unless already present
    /// and removes it from the opposite list. Concurrent callers on the same
    /// record never lose each other's changes.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(fields))` - The record after the update
    /// * `Ok(None)` - No record with this id exists
    /// * `Err(RepositoryError::MalformedRecord)` - A voter list is not a list of strings
    async fn cast_embedded_vote(
        &self,
        id: &VoteableId,
        voter_id: &str,
        vote: VoteValue,
    ) -> Result<Option<Fields>, RepositoryError>;
}
