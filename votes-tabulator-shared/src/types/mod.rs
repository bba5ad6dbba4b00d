mod fields;
mod tabulated_result;
mod vote_points;
mod vote_relation;
mod vote_value;
mod voteable_id;
mod voter_lists;
mod votes_count;

pub use fields::{
    DOWN_COUNT_FIELD, DOWN_VOTERS_FIELD, Fields, MalformedField, SCORE_FIELD, UP_COUNT_FIELD,
    UP_VOTERS_FIELD,
};
pub use tabulated_result::TabulatedResult;
pub use vote_points::VotePoints;
pub use vote_relation::{NewVoteRelation, RelationUpdate, RelationUpsert, VoteRelation};
pub use vote_value::{InvalidVoteType, VoteValue};
pub use voteable_id::VoteableId;
pub use voter_lists::VoterLists;
pub use votes_count::VotesCount;
