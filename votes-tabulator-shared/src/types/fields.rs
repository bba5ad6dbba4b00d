//! Field names the tabulator owns on a voteable record.
//!
//! A voteable record is an open JSON object; the tabulator only ever reads
//! and writes the fields named here and leaves everything else untouched.
use serde_json::{Map, Value};

/// The attribute map of a voteable record.
pub type Fields = Map<String, Value>;

/// Ordered, duplicate-free voter ids that cast an up-vote (embedded mode).
pub const UP_VOTERS_FIELD: &str = "upVoters";
/// Ordered, duplicate-free voter ids that cast a down-vote (embedded mode).
pub const DOWN_VOTERS_FIELD: &str = "downVoters";
/// Pre-aggregated up-vote counter (relational mode).
pub const UP_COUNT_FIELD: &str = "upCount";
/// Pre-aggregated down-vote counter (relational mode).
pub const DOWN_COUNT_FIELD: &str = "downCount";
/// Weighted net tally persisted alongside the counters (relational mode).
pub const SCORE_FIELD: &str = "score";

/// A vote-owned field exists on a record but holds the wrong JSON type.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("field {0} has an unexpected type")]
pub struct MalformedField(pub &'static str);

/// Reads an integer counter, treating a missing or null field as zero.
pub(crate) fn read_counter(fields: &Fields, name: &'static str) -> Result<i64, MalformedField> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(0),
        Some(value) => value.as_i64().ok_or(MalformedField(name)),
    }
}
