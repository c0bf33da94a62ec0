//! Forward-only workflow state machine.
//!
//! The round moves through its six phases one step at a time. Each step is a
//! named [`Transition`] with a fixed source and destination phase; there is
//! no way to jump to an arbitrary phase or to move backwards.

use ballot_types::WorkflowStatus;
use serde::{Deserialize, Serialize};

use crate::error::BallotError;

/// Fail with `PhaseViolation` unless `current == required`.
///
/// Every phase-gated operation starts with this check.
pub fn check_phase(
    current: WorkflowStatus,
    required: WorkflowStatus,
    operation: &'static str,
) -> Result<(), BallotError> {
    if current == required {
        Ok(())
    } else {
        Err(BallotError::PhaseViolation {
            operation,
            expected: required,
            actual: current,
        })
    }
}

/// The five forward transitions of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    StartProposalsRegistering,
    EndProposalsRegistering,
    StartVotingSession,
    EndVotingSession,
    TallyVotes,
}

impl Transition {
    pub const ALL: [Self; 5] = [
        Self::StartProposalsRegistering,
        Self::EndProposalsRegistering,
        Self::StartVotingSession,
        Self::EndVotingSession,
        Self::TallyVotes,
    ];

    /// Phase the round must be in for this transition to apply.
    pub fn source(&self) -> WorkflowStatus {
        match self {
            Self::StartProposalsRegistering => WorkflowStatus::RegisteringVoters,
            Self::EndProposalsRegistering => WorkflowStatus::ProposalsRegistrationStarted,
            Self::StartVotingSession => WorkflowStatus::ProposalsRegistrationEnded,
            Self::EndVotingSession => WorkflowStatus::VotingSessionStarted,
            Self::TallyVotes => WorkflowStatus::VotingSessionEnded,
        }
    }

    /// Phase the round is in after this transition.
    pub fn target(&self) -> WorkflowStatus {
        match self {
            Self::StartProposalsRegistering => WorkflowStatus::ProposalsRegistrationStarted,
            Self::EndProposalsRegistering => WorkflowStatus::ProposalsRegistrationEnded,
            Self::StartVotingSession => WorkflowStatus::VotingSessionStarted,
            Self::EndVotingSession => WorkflowStatus::VotingSessionEnded,
            Self::TallyVotes => WorkflowStatus::VotesTallied,
        }
    }

    /// Name of the ballot operation that performs this transition.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartProposalsRegistering => "start_proposals_registering",
            Self::EndProposalsRegistering => "end_proposals_registering",
            Self::StartVotingSession => "start_voting_session",
            Self::EndVotingSession => "end_voting_session",
            Self::TallyVotes => "tally_votes",
        }
    }
}

/// A completed phase change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseChange {
    pub previous: WorkflowStatus,
    pub next: WorkflowStatus,
}

/// Holds the current phase of a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Workflow {
    status: WorkflowStatus,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    /// Fail unless the round is currently in `required`.
    pub fn require(
        &self,
        required: WorkflowStatus,
        operation: &'static str,
    ) -> Result<(), BallotError> {
        check_phase(self.status, required, operation)
    }

    /// Apply `transition` if the round is in its source phase.
    pub fn advance(&mut self, transition: Transition) -> Result<PhaseChange, BallotError> {
        self.require(transition.source(), transition.name())?;
        let change = PhaseChange {
            previous: self.status,
            next: transition.target(),
        };
        self.status = change.next;
        Ok(change)
    }
}
