//! Timesheet gateway
//!
//! The persistence/network collaborator the workflow talks to. The engine
//! applies every transition to its own copy first and hands the result to the
//! gateway; implementations store what they are given and do not re-check
//! lifecycle guards. There is no locking or versioning: the last writer wins.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use ts_core::{DateScope, Email, Id, TsResult};
use ts_models::{Decision, Identity, TaskEntry, Timesheet};
use uuid::Uuid;

/// Identifier of one submission handed to the approval process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub Uuid);

impl ProcessId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProcessId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Storage and messaging seam for timesheets
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait TimesheetGateway: Send + Sync {
    /// All timesheets owned by an employee
    async fn load_timesheets(&self, employee_id: Id) -> TsResult<Vec<Timesheet>>;

    async fn load_timesheet(&self, id: Id) -> TsResult<Option<Timesheet>>;

    /// Replace the stored copy of a timesheet
    async fn save_timesheet(&self, timesheet: &Timesheet) -> TsResult<()>;

    /// Create an empty, unsent timesheet
    async fn create_timesheet(
        &self,
        employee_id: Id,
        employee_email: Email,
        scope: DateScope,
    ) -> TsResult<Timesheet>;

    /// Delete a timesheet together with its entries
    async fn delete_timesheet(&self, id: Id) -> TsResult<()>;

    /// Store a new entry; an entry without an id gets the next free one
    async fn create_task_entry(&self, timesheet_id: Id, entry: TaskEntry) -> TsResult<TaskEntry>;

    async fn update_task_entry(&self, timesheet_id: Id, entry: TaskEntry) -> TsResult<TaskEntry>;

    async fn delete_task_entry(&self, timesheet_id: Id, entry_id: Id) -> TsResult<()>;

    /// Announce a submission to the given approvers
    async fn submit_timesheet(&self, id: Id, approvers: Vec<Email>) -> TsResult<ProcessId>;

    /// Announce a decision; returns the stored copy as of the call
    async fn record_approval_decision(
        &self,
        id: Id,
        decision: Decision,
        approvers: Vec<Email>,
        reason: Option<String>,
    ) -> TsResult<Timesheet>;

    /// People who may be picked as approvers
    async fn load_approver_candidates(&self) -> TsResult<Vec<Identity>>;

    /// Timesheets on which `approver` is in the current approver set
    async fn load_approvals_for(&self, approver: Email) -> TsResult<Vec<Timesheet>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_ids_are_unique() {
        let a = ProcessId::new();
        let b = ProcessId::new();
        assert_ne!(a, b);
        assert_eq!(a.to_string().len(), 36);
    }

    #[tokio::test]
    async fn test_mock_gateway() {
        let mut gateway = MockTimesheetGateway::new();
        gateway
            .expect_load_timesheet()
            .withf(|id| *id == 9)
            .returning(|_| Ok(None));

        let loaded = gateway.load_timesheet(9).await.unwrap();
        assert!(loaded.is_none());
    }
}
