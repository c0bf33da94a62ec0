//! Scripted rounds: a TOML list of `[[step]]` entries replayed against one
//! [`Ballot`], and the JSON report of what happened.

use std::path::Path;

use ballot_governance::{Ballot, BallotSnapshot, ErrorKind, EventRecord, Operation, Outcome};
use ballot_types::Identity;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// One scripted call: who makes it and what it is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub caller: Identity,
    #[serde(flatten)]
    pub operation: Operation,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse {
            what: "script",
            reason: e.to_string(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepResult {
    Ok { outcome: Outcome },
    Failed { kind: ErrorKind, reason: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub caller: Identity,
    pub op: &'static str,
    #[serde(flatten)]
    pub result: StepResult,
}

/// Everything a run produced, in the order it happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub steps: Vec<StepReport>,
    /// Steps not attempted because an earlier one failed under fail-fast.
    pub skipped: usize,
    pub events: Vec<EventRecord>,
    pub final_state: BallotSnapshot,
}

impl RunReport {
    pub fn failures(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s.result, StepResult::Failed { .. }))
            .count()
    }
}

/// Replay `script` against `ballot`.
///
/// A failed step is recorded and the run continues, unless `fail_fast` is
/// set, in which case the remaining steps are counted as skipped.
pub fn run(ballot: &mut Ballot, script: &Script, fail_fast: bool) -> RunReport {
    let mut steps = Vec::with_capacity(script.steps.len());

    for (index, step) in script.steps.iter().enumerate() {
        let result = match ballot.execute(&step.caller, &step.operation) {
            Ok(outcome) => StepResult::Ok { outcome },
            Err(e) => {
                tracing::warn!(
                    step = index,
                    op = step.operation.name(),
                    caller = %step.caller,
                    kind = %e.kind(),
                    "step failed: {e}"
                );
                StepResult::Failed {
                    kind: e.kind(),
                    reason: e.reason(),
                }
            }
        };
        let failed = matches!(result, StepResult::Failed { .. });
        steps.push(StepReport {
            index,
            caller: step.caller,
            op: step.operation.name(),
            result,
        });
        if failed && fail_fast {
            break;
        }
    }

    let skipped = script.steps.len() - steps.len();
    tracing::info!(
        steps = steps.len(),
        skipped,
        status = %ballot.workflow_status(),
        "script finished"
    );

    RunReport {
        steps,
        skipped,
        events: ballot.events().records().to_vec(),
        final_state: ballot.snapshot(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_governance::EventLog;
    use ballot_types::WorkflowStatus;

    const ABC_ROUND: &str = include_str!("../rounds/abc.toml");

    fn admin() -> Identity {
        Identity::from_seed(0xad)
    }

    #[test]
    fn parses_steps_with_arguments() {
        let script = Script::from_toml_str(
            r#"
                [[step]]
                caller = "0x0101010101010101010101010101010101010101"
                op = "set_vote"
                proposal_id = 2

                [[step]]
                caller = "0x0101010101010101010101010101010101010101"
                op = "tally_votes"
            "#,
        )
        .unwrap();
        assert_eq!(script.steps.len(), 2);
        assert_eq!(script.steps[0].caller, Identity::from_seed(1));
        assert_eq!(script.steps[0].operation, Operation::SetVote { proposal_id: 2 });
        assert_eq!(script.steps[1].operation, Operation::TallyVotes);
    }

    #[test]
    fn unknown_op_is_a_parse_error() {
        let result = Script::from_toml_str(
            r#"
                [[step]]
                caller = "0x0101010101010101010101010101010101010101"
                op = "cancel_round"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Parse { what: "script", .. })));
    }

    #[test]
    fn empty_script_has_no_steps() {
        assert!(Script::from_toml_str("").unwrap().steps.is_empty());
    }

    #[test]
    fn sample_round_picks_proposal_one() {
        let script = Script::from_toml_str(ABC_ROUND).unwrap();
        let mut ballot = Ballot::new(admin());
        let report = run(&mut ballot, &script, false);

        assert_eq!(report.skipped, 0);
        assert_eq!(report.failures(), 1);
        let failed = report
            .steps
            .iter()
            .find(|s| matches!(s.result, StepResult::Failed { .. }))
            .unwrap();
        assert_eq!(failed.op, "set_vote");
        assert!(matches!(
            failed.result,
            StepResult::Failed { kind: ErrorKind::DuplicateVote, .. }
        ));

        let last = report.steps.last().unwrap();
        assert_eq!(
            last.result,
            StepResult::Ok { outcome: Outcome::ProposalId { proposal_id: 1 } }
        );
        assert_eq!(report.final_state.status, WorkflowStatus::VotesTallied);
        let counts: Vec<u64> = report.final_state.proposals.iter().map(|p| p.vote_count).collect();
        assert_eq!(counts, vec![0, 2, 1]);
        assert!(ballot.check_invariants().is_ok());
    }

    #[test]
    fn fail_fast_stops_at_first_failure() {
        let script = Script::from_toml_str(ABC_ROUND).unwrap();
        let mut ballot = Ballot::new(admin());
        let report = run(&mut ballot, &script, true);

        assert_eq!(report.failures(), 1);
        assert!(report.skipped > 0);
        assert_eq!(report.steps.len() + report.skipped, script.steps.len());
        assert_eq!(report.final_state.status, WorkflowStatus::VotingSessionStarted);
    }

    #[test]
    fn disabled_event_log_reports_no_events() {
        let script = Script::from_toml_str(ABC_ROUND).unwrap();
        let mut ballot = Ballot::with_event_log(admin(), EventLog::disabled());
        let report = run(&mut ballot, &script, false);
        assert!(report.events.is_empty());
        assert_eq!(report.final_state.status, WorkflowStatus::VotesTallied);
    }

    #[test]
    fn report_serializes_kind_and_reason() {
        let script = Script::from_toml_str(
            r#"
                [[step]]
                caller = "0x0909090909090909090909090909090909090909"
                op = "start_proposals_registering"
            "#,
        )
        .unwrap();
        let mut ballot = Ballot::new(admin());
        let report = run(&mut ballot, &script, false);
        let json = serde_json::to_value(&report).unwrap();
        let step = &json["steps"][0];
        assert_eq!(step["status"], "failed");
        assert_eq!(step["kind"], "permission_denied");
        assert_eq!(step["reason"], "permission denied: caller is not the owner");
        assert_eq!(step["op"], "start_proposals_registering");
    }
}
