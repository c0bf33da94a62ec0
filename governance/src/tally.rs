//! Winner selection.

use ballot_types::{Proposal, ProposalId};
use serde::{Deserialize, Serialize};

/// Result of scanning the proposal list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyOutcome {
    pub winning_proposal_id: ProposalId,
    pub winning_vote_count: u64,
}

/// Pick the proposal with the most votes.
///
/// Scans in id order starting from `(0, 0)` and only replaces the current
/// best on a strictly greater count, so the lowest id wins a tie. With no
/// proposals, or no votes at all, the outcome is id 0 with zero votes.
pub fn winning_proposal(proposals: &[Proposal]) -> TallyOutcome {
    let mut best = TallyOutcome::default();
    for (id, proposal) in (0u64..).zip(proposals) {
        if proposal.vote_count > best.winning_vote_count {
            best = TallyOutcome {
                winning_proposal_id: id,
                winning_vote_count: proposal.vote_count,
            };
        }
    }
    best
}
