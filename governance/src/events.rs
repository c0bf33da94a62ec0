//! Events emitted by successful ballot operations.

use ballot_types::{Identity, ProposalId, WorkflowStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A structured record of a successful state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum BallotEvent {
    /// The administrator registered a voter.
    VoterRegistered { voter: Identity },
    /// The round moved to its next phase.
    WorkflowStatusChange {
        previous: WorkflowStatus,
        next: WorkflowStatus,
    },
    /// A voter submitted a proposal.
    ProposalRegistered { proposal_id: ProposalId },
    /// A voter cast their vote.
    Voted {
        voter: Identity,
        proposal_id: ProposalId,
    },
}

/// An event together with its position in the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub seq: u64,
    #[serde(flatten)]
    pub event: BallotEvent,
}

type Listener = Box<dyn Fn(&BallotEvent) + Send + Sync>;

/// Append-only event log with synchronous fan-out.
///
/// Listeners are invoked inline on the emitting thread, after the operation's
/// state changes have been applied. A disabled log still notifies listeners
/// but retains nothing.
pub struct EventLog {
    records: Vec<EventRecord>,
    next_seq: u64,
    recording: bool,
    listeners: Vec<Listener>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_seq: 0,
            recording: true,
            listeners: Vec::new(),
        }
    }

    /// A log that keeps no records.
    pub fn disabled() -> Self {
        Self {
            recording: false,
            ..Self::new()
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&BallotEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    /// Record `event`, then notify listeners. The record is stored before
    /// any listener runs, so a panicking listener cannot drop it.
    pub(crate) fn emit(&mut self, event: BallotEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        if self.recording {
            self.records.push(EventRecord {
                seq,
                event: event.clone(),
            });
        }
        for listener in &self.listeners {
            listener(&event);
        }
    }

    /// All retained records, oldest first.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&BallotEvent> {
        self.records.last().map(|r| &r.event)
    }

    /// Sequence number the next emitted event will get.
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLog")
            .field("records", &self.records.len())
            .field("next_seq", &self.next_seq)
            .field("recording", &self.recording)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn registered(seed: u8) -> BallotEvent {
        BallotEvent::VoterRegistered {
            voter: Identity::from_seed(seed),
        }
    }

    #[test]
    fn emit_appends_in_order() {
        let mut log = EventLog::new();
        log.emit(registered(1));
        log.emit(BallotEvent::ProposalRegistered { proposal_id: 0 });

        assert_eq!(log.len(), 2);
        assert_eq!(log.records()[0].seq, 0);
        assert_eq!(log.records()[1].seq, 1);
        assert_eq!(
            log.last(),
            Some(&BallotEvent::ProposalRegistered { proposal_id: 0 })
        );
    }

    #[test]
    fn emit_calls_all_listeners() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut log = EventLog::new();

        let c1 = Arc::clone(&counter);
        log.subscribe(Box::new(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));
        let c2 = Arc::clone(&counter);
        log.subscribe(Box::new(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        }));

        log.emit(registered(1));
        assert_eq!(counter.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn disabled_log_keeps_nothing_but_notifies() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut log = EventLog::disabled();
        let c = Arc::clone(&counter);
        log.subscribe(Box::new(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        log.emit(registered(1));
        log.emit(registered(2));

        assert!(log.is_empty());
        assert_eq!(log.next_seq(), 2);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn record_survives_panicking_listener() {
        let mut log = EventLog::new();
        log.subscribe(Box::new(|_| panic!("listener failed")));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            log.emit(registered(1));
        }));

        assert!(result.is_err());
        assert_eq!(log.last(), Some(&registered(1)));
        assert_eq!(log.next_seq(), 1);
    }

    #[test]
    fn records_serialize_flat() {
        let record = EventRecord {
            seq: 3,
            event: BallotEvent::ProposalRegistered { proposal_id: 7 },
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["seq"], 3);
        assert_eq!(json["event"], "ProposalRegistered");
        assert_eq!(json["proposal_id"], 7);
    }
}
