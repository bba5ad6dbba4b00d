//! Vote policy: point values and tabulation strategy, chosen once at
//! configuration time.
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use votes_tabulator_repository::{TransactionOptions, VoteStore};
use votes_tabulator_shared::types::VotePoints;

use crate::errors::TabulationError;
use crate::handle::TabulatorHandle;

/// Which tabulator applies votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabulatorStrategy {
    /// Voter lists stored on the voteable record.
    Embedded,
    /// One relation per voter plus counters on the voteable record.
    #[default]
    Relational,
}

impl FromStr for TabulatorStrategy {
    type Err = TabulationError;

    /// Accepts `embedded`/`embed` and `relational`/`edge` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "embedded" | "embed" => Ok(Self::Embedded),
            "relational" | "edge" => Ok(Self::Relational),
            other => Err(TabulationError::invalid_config(format!(
                "strategy must be 'embedded' or 'relational', got {other:?}"
            ))),
        }
    }
}

impl fmt::Display for TabulatorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded => f.write_str("embedded"),
            Self::Relational => f.write_str("relational"),
        }
    }
}

/// Validated tabulation configuration.
///
/// Pure configuration: build a [`TabulatorHandle`] from it to cast votes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VotePolicy {
    points: VotePoints,
    strategy: TabulatorStrategy,
    transaction_options: TransactionOptions,
}

impl VotePolicy {
    /// Validates point values and pairs them with a strategy.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if either point value is NaN or infinite.
    pub fn configure(
        up_point: f64,
        down_point: f64,
        strategy: TabulatorStrategy,
    ) -> Result<Self, TabulationError> {
        if !up_point.is_finite() || !down_point.is_finite() {
            return Err(TabulationError::invalid_config(format!(
                "up and down points must be finite numbers, got {up_point} and {down_point}"
            )));
        }
        Ok(Self {
            points: VotePoints::new(up_point, down_point),
            strategy,
            transaction_options: TransactionOptions::default(),
        })
    }

    /// Like [`configure`](Self::configure), from textual settings.
    pub fn parse(up_point: &str, down_point: &str, strategy: &str) -> Result<Self, TabulationError> {
        let up = parse_point("up", up_point)?;
        let down = parse_point("down", down_point)?;
        Self::configure(up, down, strategy.parse()?)
    }

    /// Require relational transactions to be durably flushed before returning.
    pub fn with_wait_for_sync(mut self, wait_for_sync: bool) -> Self {
        self.transaction_options.wait_for_sync = wait_for_sync;
        self
    }

    pub fn points(&self) -> VotePoints {
        self.points
    }

    pub fn strategy(&self) -> TabulatorStrategy {
        self.strategy
    }

    pub fn transaction_options(&self) -> TransactionOptions {
        self.transaction_options
    }

    /// Builds a handle bound to this policy's strategy and points.
    pub fn build(&self, store: Arc<dyn VoteStore>) -> TabulatorHandle {
        TabulatorHandle::new(self, store)
    }
}

impl Default for VotePolicy {
    /// `+1` / `-1` points with the relational strategy.
    fn default() -> Self {
        Self {
            points: VotePoints::default(),
            strategy: TabulatorStrategy::default(),
            transaction_options: TransactionOptions::default(),
        }
    }
}

fn parse_point(name: &str, value: &str) -> Result<f64, TabulationError> {
    value.trim().parse::<f64>().map_err(|_| {
        TabulationError::invalid_config(format!("{name} point must be a number, got {value:?}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = VotePolicy::default();
        assert_eq!(policy.points(), VotePoints::new(1.0, -1.0));
        assert_eq!(policy.strategy(), TabulatorStrategy::Relational);
        assert!(!policy.transaction_options().wait_for_sync);
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!("embedded".parse::<TabulatorStrategy>().unwrap(), TabulatorStrategy::Embedded);
        assert_eq!("embed".parse::<TabulatorStrategy>().unwrap(), TabulatorStrategy::Embedded);
        assert_eq!("Relational".parse::<TabulatorStrategy>().unwrap(), TabulatorStrategy::Relational);
        assert_eq!("edge".parse::<TabulatorStrategy>().unwrap(), TabulatorStrategy::Relational);
        assert!(matches!(
            "graph".parse::<TabulatorStrategy>(),
            Err(TabulationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_configure_rejects_non_finite_points() {
        for (up, down) in [(f64::NAN, -1.0), (1.0, f64::INFINITY), (f64::NEG_INFINITY, 0.0)] {
            assert!(matches!(
                VotePolicy::configure(up, down, TabulatorStrategy::Embedded),
                Err(TabulationError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_parse_policy() {
        let policy = VotePolicy::parse("2", "-0.5", "embed").unwrap().with_wait_for_sync(true);
        assert_eq!(policy.points(), VotePoints::new(2.0, -0.5));
        assert_eq!(policy.strategy(), TabulatorStrategy::Embedded);
        assert!(policy.transaction_options().wait_for_sync);

        assert!(matches!(
            VotePolicy::parse("one", "-1", "edge"),
            Err(TabulationError::InvalidConfig(_))
        ));
        assert!(matches!(
            VotePolicy::parse("NaN", "-1", "edge"),
            Err(TabulationError::InvalidConfig(_))
        ));
    }
}
