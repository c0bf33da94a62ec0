//! The workflow status of a voting round.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypesError;

/// The six phases of a round, in order.
///
/// A round only ever moves to the immediate successor of its current phase.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum WorkflowStatus {
    /// The administrator is registering voters.
    #[default]
    RegisteringVoters = 0,
    /// Registered voters may submit proposals.
    ProposalsRegistrationStarted = 1,
    /// Proposal submission is closed; voting has not opened yet.
    ProposalsRegistrationEnded = 2,
    /// Registered voters may cast their vote.
    VotingSessionStarted = 3,
    /// Voting is closed; awaiting the tally.
    VotingSessionEnded = 4,
    /// Terminal: the winner is fixed.
    VotesTallied = 5,
}

impl WorkflowStatus {
    pub const ALL: [Self; 6] = [
        Self::RegisteringVoters,
        Self::ProposalsRegistrationStarted,
        Self::ProposalsRegistrationEnded,
        Self::VotingSessionStarted,
        Self::VotingSessionEnded,
        Self::VotesTallied,
    ];

    /// Numeric code of this phase (0..=5).
    pub fn code(self) -> u8 {
        self as u8
    }

    /// The phase that follows this one, or `None` for the terminal phase.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::RegisteringVoters => Some(Self::ProposalsRegistrationStarted),
            Self::ProposalsRegistrationStarted => Some(Self::ProposalsRegistrationEnded),
            Self::ProposalsRegistrationEnded => Some(Self::VotingSessionStarted),
            Self::VotingSessionStarted => Some(Self::VotingSessionEnded),
            Self::VotingSessionEnded => Some(Self::VotesTallied),
            Self::VotesTallied => None,
        }
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RegisteringVoters => "RegisteringVoters",
            Self::ProposalsRegistrationStarted => "ProposalsRegistrationStarted",
            Self::ProposalsRegistrationEnded => "ProposalsRegistrationEnded",
            Self::VotingSessionStarted => "VotingSessionStarted",
            Self::VotingSessionEnded => "VotingSessionEnded",
            Self::VotesTallied => "VotesTallied",
        }
    }
}

impl TryFrom<u8> for WorkflowStatus {
    type Error = TypesError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or(TypesError::UnknownStatus(code))
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.as_str(), self.code())
    }
}
