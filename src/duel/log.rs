//! Append-only per-round narrative log attached to a duel.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Narrative text keyed by round number. A round usually receives more than
/// one append (the opening line, a player action, the NPC's answer); later
/// appends are joined onto the round's existing text with a newline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DuelLog {
    entries: BTreeMap<i32, String>,
}

impl DuelLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line to the given round, concatenating onto any text the
    /// round already holds.
    pub fn append(&mut self, round: i32, line: &str) {
        self.entries
            .entry(round)
            .and_modify(|text| {
                text.push('\n');
                text.push_str(line);
            })
            .or_insert_with(|| line.to_string());
    }

    /// Full text recorded for one round, if any.
    pub fn round_text(&self, round: i32) -> Option<&str> {
        self.entries.get(&round).map(String::as_str)
    }

    /// Number of rounds with recorded text.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rounds in ascending order with their recorded text.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &str)> {
        self.entries
            .iter()
            .map(|(round, text)| (*round, text.as_str()))
    }
}
