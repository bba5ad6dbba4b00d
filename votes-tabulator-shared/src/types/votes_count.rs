use serde_json::Value;

use crate::types::fields::{
    read_counter, Fields, MalformedField, DOWN_COUNT_FIELD, SCORE_FIELD, UP_COUNT_FIELD,
};
use crate::types::VotePoints;

/// Aggregated vote counters stored on a voteable record (relational mode).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VotesCount {
    pub upvotes: i64,
    pub downvotes: i64,
    /// Score persisted at the last counter write, if any.
    pub score: Option<f64>,
}

impl VotesCount {
    /// Reads counters from a record. Missing counters read as zero.
    pub fn from_fields(fields: &Fields) -> Result<Self, MalformedField> {
        let score = match fields.get(SCORE_FIELD) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.as_f64().ok_or(MalformedField(SCORE_FIELD))?),
        };
        Ok(Self {
            upvotes: read_counter(fields, UP_COUNT_FIELD)?,
            downvotes: read_counter(fields, DOWN_COUNT_FIELD)?,
            score,
        })
    }

    /// Applies a counter delta and recomputes the score with `points`.
    pub fn apply_delta(&self, upvotes_delta: i64, downvotes_delta: i64, points: &VotePoints) -> Self {
        let upvotes = self.upvotes + upvotes_delta;
        let downvotes = self.downvotes + downvotes_delta;
        Self {
            upvotes,
            downvotes,
            score: Some(points.score(upvotes, downvotes)),
        }
    }

    /// The stored score, or one derived from the counters when none was stored.
    pub fn score_or(&self, points: &VotePoints) -> f64 {
        self.score
            .unwrap_or_else(|| points.score(self.upvotes, self.downvotes))
    }

    /// Partial update carrying the counters and score.
    pub fn to_fields(&self, points: &VotePoints) -> Fields {
        let mut fields = Fields::new();
        fields.insert(UP_COUNT_FIELD.to_string(), Value::from(self.upvotes));
        fields.insert(DOWN_COUNT_FIELD.to_string(), Value::from(self.downvotes));
        fields.insert(SCORE_FIELD.to_string(), Value::from(self.score_or(points)));
        fields
    }
}
