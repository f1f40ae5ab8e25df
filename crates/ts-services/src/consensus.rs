//! Consensus rules
//!
//! Reduce the approval records of one review cycle to the timesheet's
//! aggregate outcome, if it has one yet.

use ts_core::config::ConsensusRule;
use ts_models::{ApprovalRecord, Decision, TimesheetStatus};

/// A settled review cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub status: TimesheetStatus,
    pub reason: Option<String>,
}

/// Outcome of `records` under `rule`; `None` while still undecided
pub fn aggregate(rule: ConsensusRule, records: &[ApprovalRecord]) -> Option<Verdict> {
    match rule {
        ConsensusRule::Unanimous => unanimous(records),
        ConsensusRule::FirstDecisionWins => first_decision(records),
    }
}

fn unanimous(records: &[ApprovalRecord]) -> Option<Verdict> {
    if records.is_empty() {
        return None;
    }
    if let Some(rejection) = records.iter().find(|r| r.decision == Decision::Rejected) {
        return Some(Verdict {
            status: TimesheetStatus::Rejected,
            reason: rejection.reason.clone(),
        });
    }
    if records.iter().all(|r| r.decision == Decision::Approved) {
        return Some(Verdict {
            status: TimesheetStatus::Approved,
            reason: None,
        });
    }
    None
}

fn first_decision(records: &[ApprovalRecord]) -> Option<Verdict> {
    let first = records
        .iter()
        .filter(|r| r.decision.is_final())
        .min_by_key(|r| r.decided_at)?;

    let status = first.decision.outcome()?;
    let reason = match status {
        TimesheetStatus::Rejected => first.reason.clone(),
        _ => None,
    };
    Some(Verdict { status, reason })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use ts_core::Email;

    fn record(approver: &str) -> ApprovalRecord {
        ApprovalRecord::pending(1, Email::parse(approver).unwrap(), 1)
    }

    fn pair() -> Vec<ApprovalRecord> {
        vec![record("a@example.com"), record("b@example.com")]
    }

    #[test]
    fn test_unanimous_waits_for_everyone() {
        let mut records = pair();
        assert_eq!(aggregate(ConsensusRule::Unanimous, &records), None);

        records[0].decide(Decision::Approved, None, Utc::now());
        assert_eq!(aggregate(ConsensusRule::Unanimous, &records), None);

        records[1].decide(Decision::Approved, None, Utc::now());
        let verdict = aggregate(ConsensusRule::Unanimous, &records).unwrap();
        assert_eq!(verdict.status, TimesheetStatus::Approved);
        assert_eq!(verdict.reason, None);
    }

    #[test]
    fn test_unanimous_any_rejection_rejects() {
        let mut records = pair();
        records[0].decide(Decision::Approved, None, Utc::now());
        records[1].decide(Decision::Rejected, Some("Hours mismatch".into()), Utc::now());

        let verdict = aggregate(ConsensusRule::Unanimous, &records).unwrap();
        assert_eq!(verdict.status, TimesheetStatus::Rejected);
        assert_eq!(verdict.reason.as_deref(), Some("Hours mismatch"));
    }

    #[test]
    fn test_first_decision_wins() {
        let mut records = pair();
        assert_eq!(aggregate(ConsensusRule::FirstDecisionWins, &records), None);

        let now = Utc::now();
        records[1].decide(Decision::Approved, None, now);
        records[0].decide(Decision::Rejected, Some("Late".into()), now + Duration::seconds(5));

        let verdict = aggregate(ConsensusRule::FirstDecisionWins, &records).unwrap();
        assert_eq!(verdict.status, TimesheetStatus::Approved);
    }

    #[test]
    fn test_no_records_no_verdict() {
        assert_eq!(aggregate(ConsensusRule::Unanimous, &[]), None);
    }
}
