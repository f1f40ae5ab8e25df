//! Timesheet model
//!
//! An employee-owned aggregate of task entries for a date or date range,
//! carrying its approval status and the records of the current review cycle.
//! Total duration and task count are always computed from `entries`.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_core::{DateScope, Email, Entity, Hours, Id, Identifiable, TsResult, ValidationErrors};

use crate::approval::{ApprovalRecord, ReviewCycle};
use crate::duration::total_duration;
use crate::status::{Decision, TimesheetStatus};
use crate::task_entry::TaskEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timesheet {
    pub id: Id,
    pub employee_id: Id,
    pub employee_email: Email,
    pub scope: DateScope,

    /// Insertion order is kept for display
    #[serde(default)]
    pub entries: Vec<TaskEntry>,

    #[serde(default)]
    pub status: TimesheetStatus,

    /// Present iff `status` is `Rejected`
    pub rejection_reason: Option<String>,

    /// Approvers of the current cycle
    #[serde(default)]
    pub approvers: Vec<Email>,

    /// Records of the current cycle, one per approver
    #[serde(default)]
    pub approvals: Vec<ApprovalRecord>,

    /// Current submission cycle; 0 before the first submission
    #[serde(default)]
    pub cycle: u32,

    #[serde(default)]
    pub history: Vec<ReviewCycle>,
}

impl Identifiable for Timesheet {
    fn id(&self) -> Option<Id> {
        Some(self.id)
    }
}

impl Entity for Timesheet {
    const TYPE_NAME: &'static str = "Timesheet";
}

impl Timesheet {
    /// A fresh, unsent timesheet with no entries and no approvers
    pub fn new(id: Id, employee_id: Id, employee_email: Email, scope: DateScope) -> Self {
        Self {
            id,
            employee_id,
            employee_email,
            scope,
            entries: Vec::new(),
            status: TimesheetStatus::NotSent,
            rejection_reason: None,
            approvers: Vec::new(),
            approvals: Vec::new(),
            cycle: 0,
            history: Vec::new(),
        }
    }

    pub fn total_duration(&self) -> TsResult<Hours> {
        total_duration(&self.entries)
    }

    pub fn task_count(&self) -> usize {
        self.entries.len()
    }

    pub fn status_label(&self) -> &'static str {
        self.status.label()
    }

    /// Date used for filtering
    pub fn date(&self) -> NaiveDate {
        self.scope.anchor()
    }

    pub fn entry(&self, entry_id: Id) -> Option<&TaskEntry> {
        self.entries.iter().find(|e| e.id == Some(entry_id))
    }

    pub fn entry_position(&self, entry_id: Id) -> Option<usize> {
        self.entries.iter().position(|e| e.id == Some(entry_id))
    }

    /// Next free entry identifier within this timesheet
    pub fn next_entry_id(&self) -> Id {
        self.entries
            .iter()
            .filter_map(|e| e.id)
            .max()
            .unwrap_or(0)
            + 1
    }

    pub fn has_approver(&self, approver: &Email) -> bool {
        self.approvers.contains(approver)
    }

    pub fn approval_for(&self, approver: &Email) -> Option<&ApprovalRecord> {
        self.approvals.iter().find(|r| &r.approver == approver)
    }

    /// Per-approver derived decision in the current cycle
    pub fn decision_for(&self, approver: &Email) -> Option<Decision> {
        self.approval_for(approver).map(|r| r.decision)
    }

    pub fn pending_approvers(&self) -> impl Iterator<Item = &Email> {
        self.approvals
            .iter()
            .filter(|r| r.is_pending())
            .map(|r| &r.approver)
    }

    /// Most recent rejection reason, from the current cycle or history
    pub fn last_rejection(&self) -> Option<&str> {
        if let Some(reason) = self.rejection_reason.as_deref() {
            return Some(reason);
        }
        self.history
            .iter()
            .rev()
            .filter(|c| c.outcome == TimesheetStatus::Rejected)
            .find_map(|c| c.reason.as_deref())
    }

    /// Whether `rejection_reason` agrees with `status`
    pub fn reason_is_consistent(&self) -> bool {
        match self.status {
            TimesheetStatus::Rejected => self.rejection_reason.is_some(),
            _ => self.rejection_reason.is_none(),
        }
    }

    /// Check a timesheet that did not come through the workflow
    ///
    /// Interval errors surface as `InvalidInterval`; every structural
    /// problem is collected into one `Validation` error.
    pub fn check_invariants(&self) -> TsResult<()> {
        for entry in &self.entries {
            entry.duration()?;
        }

        let mut errors = ValidationErrors::new();

        let mut entry_ids = HashSet::new();
        for id in self.entries.iter().filter_map(|e| e.id) {
            if !entry_ids.insert(id) {
                errors.add("entries", format!("repeat entry id {}", id));
            }
        }

        if !self.reason_is_consistent() {
            errors.add("rejectionReason", format!("does not match status {}", self.status_label()));
        }

        if self.status == TimesheetStatus::NotSent {
            if !self.approvals.is_empty() {
                errors.add("approvals", "must be empty before the first submission");
            }
        } else {
            if self.approvers.is_empty() {
                errors.add("approvers", format!("can't be empty while {}", self.status_label()));
            }
            if self.cycle == 0 {
                errors.add("cycle", format!("must be at least 1 while {}", self.status_label()));
            }
        }

        let mut approvers = HashSet::new();
        for approver in &self.approvers {
            if !approvers.insert(approver) {
                errors.add("approvers", format!("repeat approver {}", approver));
            }
        }

        if self.status != TimesheetStatus::NotSent {
            let recorded: HashSet<&Email> = self.approvals.iter().map(|r| &r.approver).collect();
            if recorded != approvers || self.approvals.len() != self.approvers.len() {
                errors.add("approvals", "must hold one record per approver");
            }
            if self.approvals.iter().any(|r| r.cycle != self.cycle || r.timesheet_id != self.id) {
                errors.add("approvals", "must belong to the current cycle");
            }
        }

        errors.into_result()
    }
}
