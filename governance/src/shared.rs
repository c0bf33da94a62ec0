//! Thread-safe handle around a single ballot.

use std::sync::{Arc, Mutex, MutexGuard};

use ballot_types::Identity;

use crate::engine::Ballot;
use crate::error::BallotError;
use crate::operation::{Operation, Outcome};

/// A ballot shared between threads.
///
/// Every operation runs under one mutex, so callers observe a strict total
/// order of operations. A poisoned lock is recovered: operations write
/// nothing until their checks pass, and an event is recorded before any
/// listener runs, so a panicking listener leaves the state change and its
/// record in place.
#[derive(Clone, Debug)]
pub struct SharedBallot {
    inner: Arc<Mutex<Ballot>>,
}

impl SharedBallot {
    pub fn new(ballot: Ballot) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ballot)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Ballot> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("ballot lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Run `operation` for `caller` under the lock.
    pub fn execute(&self, caller: &Identity, operation: &Operation) -> Result<Outcome, BallotError> {
        self.lock().execute(caller, operation)
    }

    /// Run an arbitrary closure against the ballot under the lock.
    pub fn with<T>(&self, f: impl FnOnce(&mut Ballot) -> T) -> T {
        f(&mut self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{BallotEvent, EventLog};
    use std::panic::{self, AssertUnwindSafe};
    use std::thread;

    #[test]
    fn concurrent_votes_are_all_counted() {
        let admin = Identity::from_seed(0xad);
        let mut ballot = Ballot::new(admin);
        let voters: Vec<Identity> = (1..=16).map(Identity::from_seed).collect();
        for v in &voters {
            ballot.add_voter(&admin, *v).unwrap();
        }
        ballot.start_proposals_registering(&admin).unwrap();
        ballot.add_proposal(&voters[0], "X").unwrap();
        ballot.add_proposal(&voters[0], "Y").unwrap();
        ballot.end_proposals_registering(&admin).unwrap();
        ballot.start_voting_session(&admin).unwrap();

        let shared = SharedBallot::new(ballot);
        let handles: Vec<_> = voters
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let shared = shared.clone();
                let v = *v;
                thread::spawn(move || {
                    shared.execute(
                        &v,
                        &Operation::SetVote {
                            proposal_id: (i % 2) as u64,
                        },
                    )
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        shared.with(|ballot| {
            assert_eq!(ballot.votes_cast(), 16);
            assert!(ballot.check_invariants().is_ok());
        });
    }

    #[test]
    fn panicking_listener_keeps_vote_and_event_together() {
        let admin = Identity::from_seed(0xad);
        let v = Identity::from_seed(1);
        let mut events = EventLog::new();
        events.subscribe(Box::new(|event| {
            if matches!(event, BallotEvent::Voted { .. }) {
                panic!("listener failed on vote");
            }
        }));
        let mut ballot = Ballot::with_event_log(admin, events);
        ballot.add_voter(&admin, v).unwrap();
        ballot.start_proposals_registering(&admin).unwrap();
        ballot.add_proposal(&v, "X").unwrap();
        ballot.end_proposals_registering(&admin).unwrap();
        ballot.start_voting_session(&admin).unwrap();

        let shared = SharedBallot::new(ballot);
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            shared.execute(&v, &Operation::SetVote { proposal_id: 0 })
        }));
        assert!(result.is_err());

        shared.with(|ballot| {
            assert!(ballot.get_voter(&v, &v).unwrap().has_voted);
            assert_eq!(ballot.votes_cast(), 1);
            assert_eq!(
                ballot.events().last(),
                Some(&BallotEvent::Voted {
                    voter: v,
                    proposal_id: 0
                })
            );
            assert!(ballot.check_invariants().is_ok());
        });
    }

    #[test]
    fn duplicate_votes_race_to_one_success() {
        let admin = Identity::from_seed(0xad);
        let v = Identity::from_seed(1);
        let mut ballot = Ballot::new(admin);
        ballot.add_voter(&admin, v).unwrap();
        ballot.start_proposals_registering(&admin).unwrap();
        ballot.add_proposal(&v, "X").unwrap();
        ballot.end_proposals_registering(&admin).unwrap();
        ballot.start_voting_session(&admin).unwrap();

        let shared = SharedBallot::new(ballot);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || shared.execute(&v, &Operation::SetVote { proposal_id: 0 }))
            })
            .collect();
        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(Result::is_ok)
            .count();
        assert_eq!(successes, 1);
        shared.with(|ballot| assert_eq!(ballot.votes_cast(), 1));
    }
}
