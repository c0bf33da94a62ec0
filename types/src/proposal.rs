//! Proposals submitted during the proposal phase.

use serde::{Deserialize, Serialize};

/// Zero-based insertion position of a proposal. Permanent once assigned.
pub type ProposalId = u64;

/// A proposal and its running vote count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub description: String,
    pub vote_count: u64,
}

impl Proposal {
    /// A new proposal with no votes.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            vote_count: 0,
        }
    }
}
