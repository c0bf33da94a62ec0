//! Single-round permissioned voting.
//!
//! A fixed administrator drives the round through six phases:
//! RegisteringVoters → ProposalsRegistrationStarted → ProposalsRegistrationEnded
//! → VotingSessionStarted → VotingSessionEnded → VotesTallied.
//! Registered voters submit proposals and cast exactly one vote each; the
//! tally fixes the proposal with the most votes (lowest id on a tie).
//!
//! All state lives in one [`Ballot`]; [`SharedBallot`] serializes access for
//! multi-threaded callers.

pub mod access;
pub mod engine;
pub mod error;
pub mod events;
pub mod invariants;
pub mod ledger;
pub mod operation;
pub mod proposal;
pub mod shared;
pub mod tally;
pub mod voters;
pub mod workflow;

pub use access::AccessControl;
pub use engine::{Ballot, BallotSnapshot};
pub use error::{BallotError, Denial, ErrorKind, InvalidInput, InvariantViolation};
pub use events::{BallotEvent, EventLog, EventRecord};
pub use ledger::VotingLedger;
pub use operation::{Operation, Outcome};
pub use proposal::ProposalRegistry;
pub use shared::SharedBallot;
pub use tally::{winning_proposal, TallyOutcome};
pub use voters::VoterRegistry;
pub use workflow::{check_phase, PhaseChange, Transition, Workflow};
