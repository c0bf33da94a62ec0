//! Append-only proposal registry.

use ballot_types::{Proposal, ProposalId};

use crate::error::{BallotError, InvalidInput};

/// Ordered list of proposals. A proposal's id is its index.
#[derive(Clone, Debug, Default)]
pub struct ProposalRegistry {
    proposals: Vec<Proposal>,
}

impl ProposalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a proposal and return its id.
    pub fn submit(&mut self, description: &str) -> Result<ProposalId, BallotError> {
        if description.is_empty() {
            return Err(BallotError::InvalidInput(InvalidInput::EmptyDescription));
        }
        let id = self.count();
        self.proposals.push(Proposal::new(description));
        Ok(id)
    }

    pub fn get(&self, id: ProposalId) -> Result<&Proposal, BallotError> {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.proposals.get(index))
            .ok_or(BallotError::OutOfRange {
                proposal_id: id,
                count: self.count(),
            })
    }

    /// Add one vote to proposal `id`. The ledger validates `id` first.
    pub(crate) fn increment(&mut self, id: ProposalId) -> Result<(), BallotError> {
        let count = self.count();
        let proposal = usize::try_from(id)
            .ok()
            .and_then(|index| self.proposals.get_mut(index))
            .ok_or(BallotError::OutOfRange {
                proposal_id: id,
                count,
            })?;
        proposal.vote_count += 1;
        Ok(())
    }

    pub fn count(&self) -> u64 {
        self.proposals.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    /// All proposals in id order.
    pub fn as_slice(&self) -> &[Proposal] {
        &self.proposals
    }

    /// Sum of all vote counts.
    pub fn total_votes(&self) -> u64 {
        self.proposals.iter().map(|p| p.vote_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_insertion_positions() {
        let mut registry = ProposalRegistry::new();
        assert_eq!(registry.submit("X").unwrap(), 0);
        assert_eq!(registry.submit("Y").unwrap(), 1);
        assert_eq!(registry.submit("X").unwrap(), 2);
        assert_eq!(registry.get(1).unwrap().description, "Y");
        assert_eq!(registry.count(), 3);
    }

    #[test]
    fn empty_description_is_rejected() {
        let mut registry = ProposalRegistry::new();
        assert_eq!(
            registry.submit(""),
            Err(BallotError::InvalidInput(InvalidInput::EmptyDescription))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn lookup_past_the_end_is_out_of_range() {
        let mut registry = ProposalRegistry::new();
        registry.submit("X").unwrap();
        assert_eq!(
            registry.get(1).unwrap_err(),
            BallotError::OutOfRange {
                proposal_id: 1,
                count: 1
            }
        );
        assert!(registry.get(u64::MAX).is_err());
    }

    #[test]
    fn increment_counts_votes() {
        let mut registry = ProposalRegistry::new();
        registry.submit("X").unwrap();
        registry.submit("Y").unwrap();
        registry.increment(1).unwrap();
        registry.increment(1).unwrap();
        assert_eq!(registry.get(1).unwrap().vote_count, 2);
        assert_eq!(registry.total_votes(), 2);
        assert!(registry.increment(2).is_err());
    }
}
