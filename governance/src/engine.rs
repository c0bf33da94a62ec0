//! The ballot instance: one voting round driven by a fixed administrator.

use ballot_types::{Identity, Proposal, ProposalId, Voter, WorkflowStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::access::AccessControl;
use crate::error::{BallotError, InvariantViolation};
use crate::events::{BallotEvent, EventLog};
use crate::invariants;
use crate::ledger::VotingLedger;
use crate::operation::{Operation, Outcome};
use crate::proposal::ProposalRegistry;
use crate::tally;
use crate::voters::VoterRegistry;
use crate::workflow::{check_phase, PhaseChange, Transition, Workflow};

/// A single voting round.
///
/// Every operation takes the calling identity explicitly. Operations are
/// atomic: each one runs all of its checks before touching any state, and
/// events are only emitted once the state change has been applied.
#[derive(Debug)]
pub struct Ballot {
    access: AccessControl,
    workflow: Workflow,
    voters: VoterRegistry,
    proposals: ProposalRegistry,
    ledger: VotingLedger,
    winning_proposal_id: Option<ProposalId>,
    events: EventLog,
}

/// Serializable view of the whole ballot state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotSnapshot {
    pub owner: Identity,
    pub status: WorkflowStatus,
    pub voters: BTreeMap<Identity, Voter>,
    pub proposals: Vec<Proposal>,
    pub votes_cast: u64,
    pub winning_proposal_id: Option<ProposalId>,
}

impl Ballot {
    /// A new round in `RegisteringVoters`, administered by `owner`.
    pub fn new(owner: Identity) -> Self {
        Self::with_event_log(owner, EventLog::new())
    }

    pub fn with_event_log(owner: Identity, events: EventLog) -> Self {
        tracing::info!(owner = %owner, "ballot created");
        Self {
            access: AccessControl::new(owner),
            workflow: Workflow::new(),
            voters: VoterRegistry::new(),
            proposals: ProposalRegistry::new(),
            ledger: VotingLedger::new(),
            winning_proposal_id: None,
            events,
        }
    }

    // ── Voter registration ─────────────────────────────────────────────

    /// Register `target` as a voter. Admin only, `RegisteringVoters` only.
    pub fn add_voter(&mut self, caller: &Identity, target: Identity) -> Result<(), BallotError> {
        self.guarded("add_voter", caller, |ballot| {
            ballot.access.require_admin(caller)?;
            ballot
                .workflow
                .require(WorkflowStatus::RegisteringVoters, "add_voter")?;
            ballot.voters.register(target)?;
            tracing::info!(voter = %target, "voter registered");
            ballot.events.emit(BallotEvent::VoterRegistered { voter: target });
            Ok(())
        })
    }

    /// Read `target`'s voter record. Callable by any registered voter.
    pub fn get_voter(&self, caller: &Identity, target: &Identity) -> Result<Voter, BallotError> {
        self.observed("get_voter", caller, || {
            self.voters.require_registered(caller)?;
            Ok(self.voters.get(target))
        })
    }

    // ── Proposals ──────────────────────────────────────────────────────

    /// Submit a proposal and return its id.
    pub fn add_proposal(
        &mut self,
        caller: &Identity,
        description: &str,
    ) -> Result<ProposalId, BallotError> {
        self.guarded("add_proposal", caller, |ballot| {
            ballot.voters.require_registered(caller)?;
            ballot
                .workflow
                .require(WorkflowStatus::ProposalsRegistrationStarted, "add_proposal")?;
            let proposal_id = ballot.proposals.submit(description)?;
            tracing::info!(proposer = %caller, proposal_id, "proposal registered");
            ballot
                .events
                .emit(BallotEvent::ProposalRegistered { proposal_id });
            Ok(proposal_id)
        })
    }

    /// Read one proposal. Callable by any registered voter, in any phase.
    pub fn get_one_proposal(
        &self,
        caller: &Identity,
        proposal_id: ProposalId,
    ) -> Result<Proposal, BallotError> {
        self.observed("get_one_proposal", caller, || {
            self.voters.require_registered(caller)?;
            self.proposals.get(proposal_id).cloned()
        })
    }

    // ── Voting ─────────────────────────────────────────────────────────

    /// Cast `caller`'s single vote for `proposal_id`.
    pub fn set_vote(
        &mut self,
        caller: &Identity,
        proposal_id: ProposalId,
    ) -> Result<(), BallotError> {
        self.guarded("set_vote", caller, |ballot| {
            ballot.voters.require_registered(caller)?;
            ballot
                .workflow
                .require(WorkflowStatus::VotingSessionStarted, "set_vote")?;
            ballot.ledger.cast(
                &mut ballot.voters,
                &mut ballot.proposals,
                caller,
                proposal_id,
            )?;
            tracing::info!(voter = %caller, proposal_id, "vote recorded");
            ballot.events.emit(BallotEvent::Voted {
                voter: *caller,
                proposal_id,
            });
            Ok(())
        })
    }

    // ── Workflow ───────────────────────────────────────────────────────

    pub fn start_proposals_registering(
        &mut self,
        caller: &Identity,
    ) -> Result<PhaseChange, BallotError> {
        self.transition(caller, Transition::StartProposalsRegistering)
    }

    pub fn end_proposals_registering(
        &mut self,
        caller: &Identity,
    ) -> Result<PhaseChange, BallotError> {
        self.transition(caller, Transition::EndProposalsRegistering)
    }

    pub fn start_voting_session(&mut self, caller: &Identity) -> Result<PhaseChange, BallotError> {
        self.transition(caller, Transition::StartVotingSession)
    }

    pub fn end_voting_session(&mut self, caller: &Identity) -> Result<PhaseChange, BallotError> {
        self.transition(caller, Transition::EndVotingSession)
    }

    /// Fix the winner and close the round. Admin only, once, after voting
    /// has ended.
    pub fn tally_votes(&mut self, caller: &Identity) -> Result<ProposalId, BallotError> {
        self.guarded("tally_votes", caller, |ballot| {
            ballot.access.require_admin(caller)?;
            ballot
                .workflow
                .require(Transition::TallyVotes.source(), "tally_votes")?;
            let outcome = tally::winning_proposal(ballot.proposals.as_slice());
            let change = ballot.workflow.advance(Transition::TallyVotes)?;
            ballot.winning_proposal_id = Some(outcome.winning_proposal_id);
            tracing::info!(
                winning_proposal_id = outcome.winning_proposal_id,
                winning_vote_count = outcome.winning_vote_count,
                "votes tallied"
            );
            ballot.emit_phase_change(change);
            Ok(outcome.winning_proposal_id)
        })
    }

    /// Admin-gated phase step. The tally step goes through
    /// [`Ballot::tally_votes`] instead, which also fixes the winner.
    fn transition(
        &mut self,
        caller: &Identity,
        transition: Transition,
    ) -> Result<PhaseChange, BallotError> {
        self.guarded(transition.name(), caller, |ballot| {
            ballot.access.require_admin(caller)?;
            let change = ballot.workflow.advance(transition)?;
            ballot.emit_phase_change(change);
            Ok(change)
        })
    }

    fn emit_phase_change(&mut self, change: PhaseChange) {
        tracing::info!(
            previous = %change.previous,
            next = %change.next,
            "workflow status changed"
        );
        self.events.emit(BallotEvent::WorkflowStatusChange {
            previous: change.previous,
            next: change.next,
        });
    }

    // ── Reads ──────────────────────────────────────────────────────────

    pub fn owner(&self) -> Identity {
        self.access.owner()
    }

    pub fn workflow_status(&self) -> WorkflowStatus {
        self.workflow.status()
    }

    /// The winning proposal. Only available once votes have been tallied.
    pub fn winning_proposal_id(&self) -> Result<ProposalId, BallotError> {
        check_phase(
            self.workflow.status(),
            WorkflowStatus::VotesTallied,
            "winning_proposal_id",
        )?;
        // The tally sets the winner in the same step that enters VotesTallied.
        Ok(self.winning_proposal_id.unwrap_or_default())
    }

    pub fn proposal_count(&self) -> u64 {
        self.proposals.count()
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    pub fn votes_cast(&self) -> u64 {
        self.ledger.votes_cast()
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Register a listener for every event emitted from now on.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&BallotEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub fn snapshot(&self) -> BallotSnapshot {
        BallotSnapshot {
            owner: self.access.owner(),
            status: self.workflow.status(),
            voters: self.voters.iter().map(|(id, v)| (*id, *v)).collect(),
            proposals: self.proposals.as_slice().to_vec(),
            votes_cast: self.ledger.votes_cast(),
            winning_proposal_id: self.winning_proposal_id,
        }
    }

    /// Verify the cross-component invariants against the current state.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        invariants::check_vote_conservation(&self.voters, &self.proposals, &self.ledger)?;
        invariants::check_votes_reference_proposals(&self.voters, &self.proposals)?;
        invariants::check_winner_phase(self.workflow.status(), self.winning_proposal_id)
    }

    // ── Dispatch ───────────────────────────────────────────────────────

    /// Run `operation` on behalf of `caller`.
    pub fn execute(
        &mut self,
        caller: &Identity,
        operation: &Operation,
    ) -> Result<Outcome, BallotError> {
        match operation {
            Operation::AddVoter { target } => self.add_voter(caller, *target).map(|_| Outcome::Done),
            Operation::GetVoter { target } => self.get_voter(caller, target).map(Outcome::Voter),
            Operation::AddProposal { description } => self
                .add_proposal(caller, description)
                .map(|proposal_id| Outcome::ProposalId { proposal_id }),
            Operation::GetOneProposal { proposal_id } => self
                .get_one_proposal(caller, *proposal_id)
                .map(Outcome::Proposal),
            Operation::SetVote { proposal_id } => {
                self.set_vote(caller, *proposal_id).map(|_| Outcome::Done)
            }
            Operation::TallyVotes => self
                .tally_votes(caller)
                .map(|proposal_id| Outcome::ProposalId { proposal_id }),
            Operation::WinningProposalId => self
                .winning_proposal_id()
                .map(|proposal_id| Outcome::ProposalId { proposal_id }),
            Operation::StartProposalsRegistering => self
                .start_proposals_registering(caller)
                .map(Outcome::PhaseChange),
            Operation::EndProposalsRegistering => self
                .end_proposals_registering(caller)
                .map(Outcome::PhaseChange),
            Operation::StartVotingSession => self
                .start_voting_session(caller)
                .map(Outcome::PhaseChange),
            Operation::EndVotingSession => self
                .end_voting_session(caller)
                .map(Outcome::PhaseChange),
        }
    }

    // ── Helpers ────────────────────────────────────────────────────────

    fn guarded<T>(
        &mut self,
        operation: &'static str,
        caller: &Identity,
        body: impl FnOnce(&mut Self) -> Result<T, BallotError>,
    ) -> Result<T, BallotError> {
        let result = body(self);
        log_rejection(operation, caller, &result);
        result
    }

    fn observed<T>(
        &self,
        operation: &'static str,
        caller: &Identity,
        body: impl FnOnce() -> Result<T, BallotError>,
    ) -> Result<T, BallotError> {
        let result = body();
        log_rejection(operation, caller, &result);
        result
    }
}

fn log_rejection<T>(operation: &'static str, caller: &Identity, result: &Result<T, BallotError>) {
    if let Err(e) = result {
        tracing::debug!(operation, caller = %caller, kind = %e.kind(), "operation rejected: {e}");
    }
}
