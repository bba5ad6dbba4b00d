//! Tabulators apply a single vote and report the resulting tally.
//!
//! Both strategies implement [`Tabulate`]; [`Tabulator`] is the variant picked
//! once by the vote policy and dispatched on every call.
mod embedded;
mod relational;

use async_trait::async_trait;
use votes_tabulator_shared::types::{TabulatedResult, VotePoints, VoteValue, VoteableId};

use crate::errors::TabulationError;

pub use embedded::EmbeddedTabulator;
pub use relational::RelationalTabulator;

/// The contract shared by both tabulation strategies.
#[async_trait]
pub trait Tabulate: Send + Sync {
    /// Records `voter_id`'s `vote` on `voteable` and returns the new tally.
    ///
    /// Repeating the same vote is a no-op; the opposite vote switches the
    /// voter's contribution.
    async fn cast_vote(
        &self,
        voter_id: &str,
        voteable: &VoteableId,
        vote: VoteValue,
        points: &VotePoints,
    ) -> Result<TabulatedResult, TabulationError>;

    /// Reads the current tally without voting.
    async fn tally(
        &self,
        voteable: &VoteableId,
        points: &VotePoints,
    ) -> Result<TabulatedResult, TabulationError>;
}

/// A configured tabulation strategy.
pub enum Tabulator {
    Embedded(EmbeddedTabulator),
    Relational(RelationalTabulator),
}

#[async_trait]
impl Tabulate for Tabulator {
    async fn cast_vote(
        &self,
        voter_id: &str,
        voteable: &VoteableId,
        vote: VoteValue,
        points: &VotePoints,
    ) -> Result<TabulatedResult, TabulationError> {
        match self {
            Tabulator::Embedded(tabulator) => tabulator.cast_vote(voter_id, voteable, vote, points).await,
            Tabulator::Relational(tabulator) => tabulator.cast_vote(voter_id, voteable, vote, points).await,
        }
    }

    async fn tally(
        &self,
        voteable: &VoteableId,
        points: &VotePoints,
    ) -> Result<TabulatedResult, TabulationError> {
        match self {
            Tabulator::Embedded(tabulator) => tabulator.tally(voteable, points).await,
            Tabulator::Relational(tabulator) => tabulator.tally(voteable, points).await,
        }
    }
}
