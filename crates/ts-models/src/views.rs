//! Read-only projections handed to presentation collaborators

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use ts_core::{DateScope, Email, Hours, Id, TsError, TsResult};

use crate::status::{Decision, TimesheetStatus};
use crate::task_entry::TaskEntry;
use crate::timesheet::Timesheet;

/// One line of a timesheet listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetSummary {
    pub id: Id,
    pub employee_email: Email,
    pub scope: DateScope,
    pub status: TimesheetStatus,
    pub status_label: &'static str,
    pub total_duration: Hours,
    pub task_count: usize,
    pub approvers: Vec<Email>,
    pub rejection_reason: Option<String>,
}

impl TryFrom<&Timesheet> for TimesheetSummary {
    type Error = TsError;

    fn try_from(ts: &Timesheet) -> TsResult<Self> {
        Ok(Self {
            id: ts.id,
            employee_email: ts.employee_email.clone(),
            scope: ts.scope,
            status: ts.status,
            status_label: ts.status_label(),
            total_duration: ts.total_duration()?,
            task_count: ts.task_count(),
            approvers: ts.approvers.clone(),
            rejection_reason: ts.rejection_reason.clone(),
        })
    }
}

/// Export row for a single task entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    pub task_id: Id,
    pub name: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Hours, two decimals
    pub duration: String,
}

impl TryFrom<&TaskEntry> for TaskRow {
    type Error = TsError;

    fn try_from(entry: &TaskEntry) -> TsResult<Self> {
        Ok(Self {
            task_id: entry.id.unwrap_or_default(),
            name: entry.name.clone(),
            description: entry.description.clone(),
            start: entry.start,
            end: entry.end,
            duration: entry.duration()?.to_string(),
        })
    }
}

impl TaskRow {
    pub const HEADERS: [&'static str; 6] =
        ["Task ID", "Name", "Description", "Start", "End", "Duration (hours)"];

    /// Rows for every entry of a timesheet, in display order
    pub fn for_timesheet(ts: &Timesheet) -> TsResult<Vec<TaskRow>> {
        ts.entries.iter().map(TaskRow::try_from).collect()
    }

    pub fn cells(&self) -> [String; 6] {
        [
            self.task_id.to_string(),
            self.name.clone(),
            self.description.clone(),
            self.start.format("%Y-%m-%d %H:%M").to_string(),
            self.end.format("%Y-%m-%d %H:%M").to_string(),
            self.duration.clone(),
        ]
    }
}

/// A timesheet as one approver sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalView {
    pub timesheet_id: Id,
    pub approver: Email,
    pub employee_email: Email,
    pub scope: DateScope,
    /// This approver's own decision; `Pending` until they act
    pub decision: Decision,
    pub timesheet_status: TimesheetStatus,
    pub total_duration: Hours,
    pub task_count: usize,
    /// Reason this approver gave with their decision
    pub reason: Option<String>,
    #[serde(skip)]
    pub task_names: Vec<String>,
    #[serde(skip)]
    pub task_descriptions: Vec<String>,
}

impl ApprovalView {
    /// Project a timesheet for `approver`; `None` if they are not assigned
    pub fn for_approver(ts: &Timesheet, approver: &Email) -> TsResult<Option<Self>> {
        let Some(record) = ts.approval_for(approver) else {
            return Ok(None);
        };
        Ok(Some(Self {
            timesheet_id: ts.id,
            approver: approver.clone(),
            employee_email: ts.employee_email.clone(),
            scope: ts.scope,
            decision: record.decision,
            timesheet_status: ts.status,
            total_duration: ts.total_duration()?,
            task_count: ts.task_count(),
            reason: record.reason.clone(),
            task_names: ts.entries.iter().map(|e| e.name.clone()).collect(),
            task_descriptions: ts.entries.iter().map(|e| e.description.clone()).collect(),
        }))
    }

    pub fn date(&self) -> NaiveDate {
        self.scope.anchor()
    }
}
