//! Per-participant voter record.

use serde::{Deserialize, Serialize};

use crate::proposal::ProposalId;

/// A voter record as stored by the registry.
///
/// The default value (`{false, false, 0}`) doubles as the answer for
/// identities that were never registered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub is_registered: bool,
    pub has_voted: bool,
    /// Only meaningful once `has_voted` is set.
    pub voted_proposal_id: ProposalId,
}

impl Voter {
    /// A freshly registered voter who has not voted yet.
    pub fn registered() -> Self {
        Self {
            is_registered: true,
            has_voted: false,
            voted_proposal_id: 0,
        }
    }
}
