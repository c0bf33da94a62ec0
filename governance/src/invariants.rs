//! Cross-component state invariants.
//!
//! Each check returns the first violation it finds. They are cheap enough to
//! run after every operation in tests.

use ballot_types::{ProposalId, WorkflowStatus};

use crate::error::InvariantViolation;
use crate::ledger::VotingLedger;
use crate::proposal::ProposalRegistry;
use crate::voters::VoterRegistry;

/// Sum of proposal vote counts == voters who voted == votes the ledger accepted.
pub fn check_vote_conservation(
    voters: &VoterRegistry,
    proposals: &ProposalRegistry,
    ledger: &VotingLedger,
) -> Result<(), InvariantViolation> {
    let counted = proposals.total_votes();
    let voted = voters.voted_count();
    if counted != voted {
        return Err(InvariantViolation::VoteCountMismatch { counted, voted });
    }
    if ledger.votes_cast() != counted {
        return Err(InvariantViolation::LedgerMismatch {
            recorded: ledger.votes_cast(),
            counted,
        });
    }
    Ok(())
}

/// Every recorded vote points at an existing proposal.
pub fn check_votes_reference_proposals(
    voters: &VoterRegistry,
    proposals: &ProposalRegistry,
) -> Result<(), InvariantViolation> {
    for (id, voter) in voters.iter() {
        if voter.has_voted && voter.voted_proposal_id >= proposals.count() {
            return Err(InvariantViolation::DanglingVote {
                voter: *id,
                proposal_id: voter.voted_proposal_id,
            });
        }
    }
    Ok(())
}

/// A winner exists if and only if the round has been tallied.
pub fn check_winner_phase(
    status: WorkflowStatus,
    winner: Option<ProposalId>,
) -> Result<(), InvariantViolation> {
    match (status, winner) {
        (WorkflowStatus::VotesTallied, None) => Err(InvariantViolation::MissingWinner(status)),
        (WorkflowStatus::VotesTallied, Some(_)) => Ok(()),
        (_, Some(_)) => Err(InvariantViolation::PrematureWinner(status)),
        (_, None) => Ok(()),
    }
}
