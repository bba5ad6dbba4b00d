use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::types::fields::{DOWN_VOTERS_FIELD, UP_VOTERS_FIELD};

/// Represents the type of vote cast by a voter.
///
/// There is no retract variant: a vote, once cast, can only be flipped by
/// casting the opposite type.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VoteValue {
    /// Indicates an upvote or positive endorsement.
    Up,
    /// Indicates a downvote or negative endorsement.
    Down,
}

/// Returned when a string does not name a vote type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("vote type must be one of [up, down], got {0:?}")]
pub struct InvalidVoteType(pub String);

impl VoteValue {
    /// The vote type that a switch away from `self` lands on.
    pub fn opposite(self) -> Self {
        match self {
            VoteValue::Up => VoteValue::Down,
            VoteValue::Down => VoteValue::Up,
        }
    }

    /// Stored representation, as written to the relation store.
    pub fn as_str(self) -> &'static str {
        match self {
            VoteValue::Up => "up",
            VoteValue::Down => "down",
        }
    }

    /// Name of the embedded voter list this vote type appends to.
    pub fn voters_field(self) -> &'static str {
        match self {
            VoteValue::Up => UP_VOTERS_FIELD,
            VoteValue::Down => DOWN_VOTERS_FIELD,
        }
    }
}

impl fmt::Display for VoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteValue {
    type Err = InvalidVoteType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(VoteValue::Up),
            "down" => Ok(VoteValue::Down),
            _ => Err(InvalidVoteType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vote_value() {
        assert_eq!("up".parse::<VoteValue>(), Ok(VoteValue::Up));
        assert_eq!(" DOWN ".parse::<VoteValue>(), Ok(VoteValue::Down));
    }

    #[test]
    fn test_parse_invalid_vote_value() {
        assert_eq!(
            "remove".parse::<VoteValue>(),
            Err(InvalidVoteType("remove".to_string()))
        );
        assert!("".parse::<VoteValue>().is_err());
    }

    #[test]
    fn test_opposite_and_field_names() {
        assert_eq!(VoteValue::Up.opposite(), VoteValue::Down);
        assert_eq!(VoteValue::Down.opposite(), VoteValue::Up);
        assert_eq!(VoteValue::Up.voters_field(), "upVoters");
        assert_eq!(VoteValue::Down.voters_field(), "downVoters");
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&VoteValue::Down).unwrap(), "\"down\"");
        let parsed: VoteValue = serde_json::from_str("\"up\"").unwrap();
        assert_eq!(parsed, VoteValue::Up);
    }
}
