use serde_json::Value;

use crate::types::fields::{Fields, MalformedField, DOWN_VOTERS_FIELD, UP_VOTERS_FIELD};
use crate::types::VoteValue;

/// Voter id lists stored directly on a voteable record (embedded mode).
///
/// Each list behaves as an ordered set: insertion order is vote order and a
/// voter appears at most once across both lists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoterLists {
    pub up: Vec<String>,
    pub down: Vec<String>,
}

impl VoterLists {
    /// Reads both lists from a record, treating missing or null fields as empty.
    pub fn from_fields(fields: &Fields) -> Result<Self, MalformedField> {
        Ok(Self {
            up: read_list(fields, UP_VOTERS_FIELD)?,
            down: read_list(fields, DOWN_VOTERS_FIELD)?,
        })
    }

    /// Records `voter_id`'s stance as `vote`.
    ///
    /// Appends to the target list only if absent and removes the voter from
    /// the opposite list. Returns whether anything changed.
    pub fn cast(&mut self, voter_id: &str, vote: VoteValue) -> bool {
        let (target, opposite) = match vote {
            VoteValue::Up => (&mut self.up, &mut self.down),
            VoteValue::Down => (&mut self.down, &mut self.up),
        };

        let mut changed = false;
        if !target.iter().any(|v| v == voter_id) {
            target.push(voter_id.to_string());
            changed = true;
        }
        if let Some(pos) = opposite.iter().position(|v| v == voter_id) {
            opposite.remove(pos);
            changed = true;
        }
        changed
    }

    pub fn up_count(&self) -> i64 {
        self.up.len() as i64
    }

    pub fn down_count(&self) -> i64 {
        self.down.len() as i64
    }

    /// Partial update carrying both lists.
    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(UP_VOTERS_FIELD.to_string(), list_value(&self.up));
        fields.insert(DOWN_VOTERS_FIELD.to_string(), list_value(&self.down));
        fields
    }
}

fn read_list(fields: &Fields, name: &'static str) -> Result<Vec<String>, MalformedField> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or(MalformedField(name)))
            .collect(),
        Some(_) => Err(MalformedField(name)),
    }
}

fn list_value(voters: &[String]) -> Value {
    Value::Array(voters.iter().cloned().map(Value::String).collect())
}
