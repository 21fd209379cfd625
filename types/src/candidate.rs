//! Candidate entries as enumerated by the candidate registry.

use serde::{Deserialize, Serialize};

/// A single candidate and its tally.
///
/// Candidates are addressed by their position in the registry's
/// enumeration; the position is what a vote transaction carries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Display name, unique within one registry.
    pub name: String,
    /// Number of votes recorded for this candidate.
    pub vote_count: u64,
}

impl Candidate {
    pub fn new(name: impl Into<String>, vote_count: u64) -> Self {
        Self {
            name: name.into(),
            vote_count,
        }
    }
}
