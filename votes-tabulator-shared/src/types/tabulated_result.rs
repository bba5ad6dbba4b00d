use serde::{Deserialize, Serialize};

/// Read-only projection of a voteable's tally returned to callers.
///
/// Never persisted on its own; always recomputed or re-read after a write.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabulatedResult {
    pub id: String,
    pub up_count: i64,
    pub down_count: i64,
    pub score: f64,
}
