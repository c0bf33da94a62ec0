//! Voting ledger: applies a single vote to the voter and proposal registries.

use ballot_types::{Identity, ProposalId};

use crate::error::BallotError;
use crate::proposal::ProposalRegistry;
use crate::voters::VoterRegistry;

/// Records votes. Keeps its own count of accepted votes so the registries
/// can be cross-checked against it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VotingLedger {
    votes_cast: u64,
}

impl VotingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `voter`'s vote for `proposal_id`.
    ///
    /// Fails with `DuplicateVote` if the voter already voted, then with
    /// `OutOfRange` if the proposal does not exist. Either all of the voter
    /// flag, the voted id and the proposal count are written, or none is.
    pub fn cast(
        &mut self,
        voters: &mut VoterRegistry,
        proposals: &mut ProposalRegistry,
        voter: &Identity,
        proposal_id: ProposalId,
    ) -> Result<(), BallotError> {
        voters.require_not_voted(voter)?;
        proposals.get(proposal_id)?;

        proposals.increment(proposal_id)?;
        voters.mark_voted(voter, proposal_id);
        self.votes_cast += 1;
        Ok(())
    }

    pub fn votes_cast(&self) -> u64 {
        self.votes_cast
    }
}
