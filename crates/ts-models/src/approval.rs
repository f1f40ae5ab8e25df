//! Approval records and review cycles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_core::{Email, Id};

use crate::status::{Decision, TimesheetStatus};

/// Wire value older clients send when no reason applies
pub const DEFAULT_REASON_SENTINEL: &str = "NA";

/// One approver's decision on one submission cycle of a timesheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRecord {
    pub timesheet_id: Id,
    pub approver: Email,
    pub cycle: u32,
    #[serde(default)]
    pub decision: Decision,
    pub reason: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl ApprovalRecord {
    /// Fresh record awaiting the approver's action
    pub fn pending(timesheet_id: Id, approver: Email, cycle: u32) -> Self {
        Self {
            timesheet_id,
            approver,
            cycle,
            decision: Decision::Pending,
            reason: None,
            decided_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.decision == Decision::Pending
    }

    pub fn decide(&mut self, decision: Decision, reason: Option<String>, at: DateTime<Utc>) {
        self.decision = decision;
        self.reason = reason;
        self.decided_at = Some(at);
    }
}

/// A closed submission cycle kept for history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCycle {
    pub cycle: u32,
    pub outcome: TimesheetStatus,
    pub reason: Option<String>,
    pub records: Vec<ApprovalRecord>,
}

/// Reduce a raw reason to `Some(text)` only when it carries information
///
/// Blank input and the "not applicable" sentinel both count as no reason.
pub fn normalize_reason(raw: Option<&str>, sentinel: &str) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(sentinel) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_reason() {
        assert_eq!(
            normalize_reason(Some("  Hours mismatch "), DEFAULT_REASON_SENTINEL),
            Some("Hours mismatch".to_string())
        );
        assert_eq!(normalize_reason(Some("NA"), DEFAULT_REASON_SENTINEL), None);
        assert_eq!(normalize_reason(Some("na"), DEFAULT_REASON_SENTINEL), None);
        assert_eq!(normalize_reason(Some("   "), DEFAULT_REASON_SENTINEL), None);
        assert_eq!(normalize_reason(None, DEFAULT_REASON_SENTINEL), None);
    }

    #[test]
    fn test_pending_record() {
        let email = Email::parse("boss@example.com").unwrap();
        let mut record = ApprovalRecord::pending(7, email, 1);
        assert!(record.is_pending());

        record.decide(Decision::Approved, None, Utc::now());
        assert!(!record.is_pending());
        assert!(record.decided_at.is_some());
    }
}
