//! Voter registry: identity → voter record.

use ballot_types::{Identity, ProposalId, Voter};
use std::collections::HashMap;

use crate::error::{BallotError, Denial};

/// Registry of voters. Records are created once and never removed.
#[derive(Clone, Debug, Default)]
pub struct VoterRegistry {
    voters: HashMap<Identity, Voter>,
}

impl VoterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh record for `target`.
    pub fn register(&mut self, target: Identity) -> Result<(), BallotError> {
        if self.voters.contains_key(&target) {
            return Err(BallotError::DuplicateRegistration(target));
        }
        self.voters.insert(target, Voter::registered());
        Ok(())
    }

    /// Snapshot of `target`'s record, or the default record if absent.
    pub fn get(&self, target: &Identity) -> Voter {
        self.voters.get(target).copied().unwrap_or_default()
    }

    pub fn is_registered(&self, id: &Identity) -> bool {
        self.voters.get(id).is_some_and(|v| v.is_registered)
    }

    /// Fail with `PermissionDenied(NotVoter)` unless `caller` is registered.
    pub fn require_registered(&self, caller: &Identity) -> Result<&Voter, BallotError> {
        self.voters
            .get(caller)
            .filter(|v| v.is_registered)
            .ok_or(BallotError::PermissionDenied(Denial::NotVoter))
    }

    /// Fail with `DuplicateVote` if `caller` has already voted.
    pub fn require_not_voted(&self, caller: &Identity) -> Result<(), BallotError> {
        if self.get(caller).has_voted {
            Err(BallotError::DuplicateVote(*caller))
        } else {
            Ok(())
        }
    }

    /// Record `voter`'s ballot. Only the voting ledger calls this, after it
    /// has validated the vote, so the record is known to exist.
    pub(crate) fn mark_voted(&mut self, voter: &Identity, proposal_id: ProposalId) {
        if let Some(record) = self.voters.get_mut(voter) {
            record.has_voted = true;
            record.voted_proposal_id = proposal_id;
        }
    }

    /// Number of registered voters.
    pub fn len(&self) -> usize {
        self.voters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }

    /// Number of voters that have cast their vote.
    pub fn voted_count(&self) -> u64 {
        self.voters.values().filter(|v| v.has_voted).count() as u64
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Identity, &Voter)> {
        self.voters.iter()
    }
}
