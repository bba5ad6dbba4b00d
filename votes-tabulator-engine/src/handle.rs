//! The caller-facing entry point of the engine.
use std::sync::Arc;

use tracing::debug;
use votes_tabulator_repository::VoteStore;
use votes_tabulator_shared::types::{TabulatedResult, VotePoints, VoteValue};

use crate::errors::TabulationError;
use crate::policy::{TabulatorStrategy, VotePolicy};
use crate::resolver;
use crate::tabulator::{EmbeddedTabulator, RelationalTabulator, Tabulate, Tabulator};

/// A tabulator with its point values bound.
///
/// Built from a [`VotePolicy`]; the strategy is fixed for the handle's
/// lifetime. Calls validate their inputs before touching the store and never
/// retry on failure.
pub struct TabulatorHandle {
    tabulator: Tabulator,
    points: VotePoints,
    strategy: TabulatorStrategy,
}

impl TabulatorHandle {
    pub fn new(policy: &VotePolicy, store: Arc<dyn VoteStore>) -> Self {
        let tabulator = match policy.strategy() {
            TabulatorStrategy::Embedded => Tabulator::Embedded(EmbeddedTabulator::new(store)),
            TabulatorStrategy::Relational => Tabulator::Relational(RelationalTabulator::new(
                store,
                policy.transaction_options(),
            )),
        };
        Self {
            tabulator,
            points: policy.points(),
            strategy: policy.strategy(),
        }
    }

    /// Validates the configuration and builds a handle in one step.
    pub fn configure(
        store: Arc<dyn VoteStore>,
        up_point: f64,
        down_point: f64,
        strategy: TabulatorStrategy,
    ) -> Result<Self, TabulationError> {
        Ok(VotePolicy::configure(up_point, down_point, strategy)?.build(store))
    }

    /// `+1` / `-1` points with the relational strategy.
    pub fn with_defaults(store: Arc<dyn VoteStore>) -> Self {
        VotePolicy::default().build(store)
    }

    pub fn points(&self) -> VotePoints {
        self.points
    }

    pub fn strategy(&self) -> TabulatorStrategy {
        self.strategy
    }

    pub async fn vote_up(
        &self,
        voter_id: &str,
        voteable_id: &str,
    ) -> Result<TabulatedResult, TabulationError> {
        self.cast_vote(voter_id, voteable_id, VoteValue::Up).await
    }

    pub async fn vote_down(
        &self,
        voter_id: &str,
        voteable_id: &str,
    ) -> Result<TabulatedResult, TabulationError> {
        self.cast_vote(voter_id, voteable_id, VoteValue::Down).await
    }

    /// Casts a vote given by name (`"up"` or `"down"`).
    ///
    /// # Errors
    ///
    /// `InvalidVoteType` for any other name, before any store access.
    pub async fn cast(
        &self,
        voter_id: &str,
        voteable_id: &str,
        vote_type: &str,
    ) -> Result<TabulatedResult, TabulationError> {
        let vote: VoteValue = vote_type.parse()?;
        self.cast_vote(voter_id, voteable_id, vote).await
    }

    pub async fn cast_vote(
        &self,
        voter_id: &str,
        voteable_id: &str,
        vote: VoteValue,
    ) -> Result<TabulatedResult, TabulationError> {
        resolver::validate_voter_id(voter_id)?;
        let voteable = resolver::resolve(voteable_id)?;

        debug!(voter_id, voteable_id, vote = %vote, strategy = %self.strategy, "Casting vote");
        self.tabulator
            .cast_vote(voter_id, &voteable, vote, &self.points)
            .await
    }

    /// Current tally of a voteable, without voting.
    pub async fn tally(&self, voteable_id: &str) -> Result<TabulatedResult, TabulationError> {
        let voteable = resolver::resolve(voteable_id)?;
        self.tabulator.tally(&voteable, &self.points).await
    }
}
