use ballot_types::{Identity, ProposalId, WorkflowStatus};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a caller was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Denial {
    /// Admin-only operation invoked by someone other than the owner.
    NotOwner,
    /// Voter-only operation invoked by an unregistered identity.
    NotVoter,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotOwner => write!(f, "caller is not the owner"),
            Self::NotVoter => write!(f, "you're not a voter"),
        }
    }
}

/// Rejected operation arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum InvalidInput {
    EmptyDescription,
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "proposal description is empty"),
        }
    }
}

/// Contract-style message for an operation attempted in the wrong phase.
fn phase_reason(operation: &str) -> &'static str {
    match operation {
        "add_voter" => "voters registration is not open yet",
        "add_proposal" => "proposals are not allowed yet",
        "set_vote" | "end_voting_session" => "voting session havent started yet",
        "start_proposals_registering" => "registering proposals cant be started now",
        "end_proposals_registering" => "registering proposals havent started yet",
        "start_voting_session" => "registering proposals phase is not finished",
        "tally_votes" => "current status is not voting session ended",
        "winning_proposal_id" => "votes have not been tallied yet",
        _ => "operation not allowed in the current phase",
    }
}

/// Every way a ballot operation can fail.
///
/// A failed operation never changes the ballot: all checks run before the
/// first write.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BallotError {
    #[error("permission denied: {0}")]
    PermissionDenied(Denial),

    #[error(
        "{reason}: {operation} requires phase {expected}, current phase is {actual}",
        reason = phase_reason(.operation)
    )]
    PhaseViolation {
        operation: &'static str,
        expected: WorkflowStatus,
        actual: WorkflowStatus,
    },

    #[error("{0} is already registered")]
    DuplicateRegistration(Identity),

    #[error("{0} has already voted")]
    DuplicateVote(Identity),

    #[error("invalid input: {0}")]
    InvalidInput(InvalidInput),

    #[error("proposal {proposal_id} not found ({count} proposals registered)")]
    OutOfRange { proposal_id: ProposalId, count: u64 },
}

/// Taxonomy kind of a [`BallotError`], without the details.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    PermissionDenied,
    PhaseViolation,
    DuplicateRegistration,
    DuplicateVote,
    InvalidInput,
    OutOfRange,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission_denied",
            Self::PhaseViolation => "phase_violation",
            Self::DuplicateRegistration => "duplicate_registration",
            Self::DuplicateVote => "duplicate_vote",
            Self::InvalidInput => "invalid_input",
            Self::OutOfRange => "out_of_range",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BallotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Self::PhaseViolation { .. } => ErrorKind::PhaseViolation,
            Self::DuplicateRegistration(_) => ErrorKind::DuplicateRegistration,
            Self::DuplicateVote(_) => ErrorKind::DuplicateVote,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
        }
    }

    /// Human-readable reason, as surfaced to callers.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// A broken state invariant. Seeing one of these means a bug in this crate.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("vote counts sum to {counted} but {voted} voters have voted")]
    VoteCountMismatch { counted: u64, voted: u64 },

    #[error("ledger recorded {recorded} votes but proposals hold {counted}")]
    LedgerMismatch { recorded: u64, counted: u64 },

    #[error("voter {voter} voted for missing proposal {proposal_id}")]
    DanglingVote { voter: Identity, proposal_id: ProposalId },

    #[error("winner set while status is {0}")]
    PrematureWinner(WorkflowStatus),

    #[error("status is {0} but no winner is recorded")]
    MissingWinner(WorkflowStatus),
}
