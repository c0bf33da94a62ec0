//! Operations as data, for callers that drive a ballot from a script.

use ballot_types::{Identity, Proposal, ProposalId, Voter};
use serde::{Deserialize, Serialize};

use crate::workflow::{PhaseChange, Transition};

/// One public ballot operation and its arguments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    AddVoter { target: Identity },
    GetVoter { target: Identity },
    StartProposalsRegistering,
    AddProposal { description: String },
    GetOneProposal { proposal_id: ProposalId },
    EndProposalsRegistering,
    StartVotingSession,
    SetVote { proposal_id: ProposalId },
    EndVotingSession,
    TallyVotes,
    WinningProposalId,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddVoter { .. } => "add_voter",
            Self::GetVoter { .. } => "get_voter",
            Self::AddProposal { .. } => "add_proposal",
            Self::GetOneProposal { .. } => "get_one_proposal",
            Self::SetVote { .. } => "set_vote",
            Self::WinningProposalId => "winning_proposal_id",
            other => other
                .transition()
                .map(|t| t.name())
                .unwrap_or("unknown"),
        }
    }

    /// The workflow transition this operation performs, if any.
    pub fn transition(&self) -> Option<Transition> {
        match self {
            Self::StartProposalsRegistering => Some(Transition::StartProposalsRegistering),
            Self::EndProposalsRegistering => Some(Transition::EndProposalsRegistering),
            Self::StartVotingSession => Some(Transition::StartVotingSession),
            Self::EndVotingSession => Some(Transition::EndVotingSession),
            Self::TallyVotes => Some(Transition::TallyVotes),
            _ => None,
        }
    }

    /// Whether the operation can change ballot state.
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Self::GetVoter { .. } | Self::GetOneProposal { .. } | Self::WinningProposalId
        )
    }
}

/// What a successful operation returned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Done,
    Voter(Voter),
    Proposal(Proposal),
    ProposalId { proposal_id: ProposalId },
    PhaseChange(PhaseChange),
}
