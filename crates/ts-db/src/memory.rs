//! In-memory gateway
//!
//! Backs tests and the CLI. The CLI seeds it from a JSON [`Snapshot`], which
//! is checked timesheet by timesheet before anything is stored.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;
use ts_core::{DateScope, Email, Id, TsError, TsResult};
use ts_models::{Decision, Entity, Identity, TaskEntry, Timesheet};

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::{ProcessId, TimesheetGateway};

/// Serializable state of an [`InMemoryGateway`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub timesheets: Vec<Timesheet>,
    #[serde(default)]
    pub approver_candidates: Vec<Identity>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> GatewayResult<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        let mut seen = BTreeSet::new();
        for timesheet in &snapshot.timesheets {
            if !seen.insert(timesheet.id) {
                return Err(GatewayError::DuplicateId(timesheet.id));
            }
            timesheet
                .check_invariants()
                .map_err(|source| GatewayError::InvalidTimesheet {
                    id: timesheet.id,
                    source,
                })?;
        }
        Ok(snapshot)
    }

    pub async fn load(path: impl AsRef<Path>) -> GatewayResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).await.map_err(|source| GatewayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = Self::from_json(&json)?;
        debug!(path = %path.display(), timesheets = snapshot.timesheets.len(), "Loaded snapshot");
        Ok(snapshot)
    }
}

/// A submission announced through the gateway
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionLog {
    pub process_id: ProcessId,
    pub timesheet_id: Id,
    pub approvers: Vec<Email>,
    pub at: DateTime<Utc>,
}

/// A decision announced through the gateway
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionLog {
    pub timesheet_id: Id,
    pub decision: Decision,
    pub approvers: Vec<Email>,
    pub reason: Option<String>,
    pub at: DateTime<Utc>,
}

pub struct InMemoryGateway {
    timesheets: RwLock<BTreeMap<Id, Timesheet>>,
    candidates: RwLock<Vec<Identity>>,
    submissions: RwLock<Vec<SubmissionLog>>,
    decisions: RwLock<Vec<DecisionLog>>,
    next_id: AtomicI64,
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self {
            timesheets: RwLock::new(BTreeMap::new()),
            candidates: RwLock::new(Vec::new()),
            submissions: RwLock::new(Vec::new()),
            decisions: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn with_candidates(candidates: Vec<Identity>) -> Self {
        let gateway = Self::new();
        *gateway.candidates.write() = candidates;
        gateway
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let next = snapshot
            .timesheets
            .iter()
            .map(|ts| ts.id)
            .max()
            .unwrap_or(0)
            + 1;
        let timesheets = snapshot
            .timesheets
            .into_iter()
            .map(|ts| (ts.id, ts))
            .collect();

        Self {
            timesheets: RwLock::new(timesheets),
            candidates: RwLock::new(snapshot.approver_candidates),
            submissions: RwLock::new(Vec::new()),
            decisions: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(next),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            timesheets: self.timesheets.read().values().cloned().collect(),
            approver_candidates: self.candidates.read().clone(),
        }
    }

    pub fn submissions(&self) -> Vec<SubmissionLog> {
        self.submissions.read().clone()
    }

    pub fn decisions(&self) -> Vec<DecisionLog> {
        self.decisions.read().clone()
    }

    fn missing(id: Id) -> TsError {
        TsError::not_found(Timesheet::TYPE_NAME, id)
    }
}

#[async_trait]
impl TimesheetGateway for InMemoryGateway {
    async fn load_timesheets(&self, employee_id: Id) -> TsResult<Vec<Timesheet>> {
        let timesheets = self.timesheets.read();
        Ok(timesheets
            .values()
            .filter(|ts| ts.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn load_timesheet(&self, id: Id) -> TsResult<Option<Timesheet>> {
        Ok(self.timesheets.read().get(&id).cloned())
    }

    async fn save_timesheet(&self, timesheet: &Timesheet) -> TsResult<()> {
        let mut timesheets = self.timesheets.write();
        if !timesheets.contains_key(&timesheet.id) {
            return Err(Self::missing(timesheet.id));
        }
        debug!(timesheet_id = timesheet.id, status = timesheet.status.as_str(), "Saving timesheet");
        timesheets.insert(timesheet.id, timesheet.clone());
        Ok(())
    }

    async fn create_timesheet(
        &self,
        employee_id: Id,
        employee_email: Email,
        scope: DateScope,
    ) -> TsResult<Timesheet> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let timesheet = Timesheet::new(id, employee_id, employee_email, scope);
        debug!(timesheet_id = id, employee_id, "Created timesheet");
        self.timesheets.write().insert(id, timesheet.clone());
        Ok(timesheet)
    }

    async fn delete_timesheet(&self, id: Id) -> TsResult<()> {
        match self.timesheets.write().remove(&id) {
            Some(removed) => {
                debug!(timesheet_id = id, entries = removed.task_count(), "Deleted timesheet");
                Ok(())
            }
            None => Err(Self::missing(id)),
        }
    }

    async fn create_task_entry(&self, timesheet_id: Id, mut entry: TaskEntry) -> TsResult<TaskEntry> {
        let mut timesheets = self.timesheets.write();
        let timesheet = timesheets
            .get_mut(&timesheet_id)
            .ok_or_else(|| Self::missing(timesheet_id))?;

        if entry.id.is_none() {
            entry.id = Some(timesheet.next_entry_id());
        }
        timesheet.entries.push(entry.clone());
        Ok(entry)
    }

    async fn update_task_entry(&self, timesheet_id: Id, entry: TaskEntry) -> TsResult<TaskEntry> {
        let mut timesheets = self.timesheets.write();
        let timesheet = timesheets
            .get_mut(&timesheet_id)
            .ok_or_else(|| Self::missing(timesheet_id))?;

        let entry_id = entry.id.unwrap_or_default();
        let position = timesheet
            .entry_position(entry_id)
            .ok_or_else(|| TsError::not_found(TaskEntry::TYPE_NAME, entry_id))?;
        timesheet.entries[position] = entry.clone();
        Ok(entry)
    }

    async fn delete_task_entry(&self, timesheet_id: Id, entry_id: Id) -> TsResult<()> {
        let mut timesheets = self.timesheets.write();
        let timesheet = timesheets
            .get_mut(&timesheet_id)
            .ok_or_else(|| Self::missing(timesheet_id))?;

        let position = timesheet
            .entry_position(entry_id)
            .ok_or_else(|| TsError::not_found(TaskEntry::TYPE_NAME, entry_id))?;
        timesheet.entries.remove(position);
        Ok(())
    }

    async fn submit_timesheet(&self, id: Id, approvers: Vec<Email>) -> TsResult<ProcessId> {
        if !self.timesheets.read().contains_key(&id) {
            return Err(Self::missing(id));
        }
        let process_id = ProcessId::new();
        debug!(timesheet_id = id, %process_id, approvers = approvers.len(), "Submission announced");
        self.submissions.write().push(SubmissionLog {
            process_id,
            timesheet_id: id,
            approvers,
            at: Utc::now(),
        });
        Ok(process_id)
    }

    async fn record_approval_decision(
        &self,
        id: Id,
        decision: Decision,
        approvers: Vec<Email>,
        reason: Option<String>,
    ) -> TsResult<Timesheet> {
        let stored = self
            .timesheets
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::missing(id))?;

        debug!(timesheet_id = id, decision = decision.label(), "Decision announced");
        self.decisions.write().push(DecisionLog {
            timesheet_id: id,
            decision,
            approvers,
            reason,
            at: Utc::now(),
        });
        Ok(stored)
    }

    async fn load_approver_candidates(&self) -> TsResult<Vec<Identity>> {
        Ok(self.candidates.read().clone())
    }

    async fn load_approvals_for(&self, approver: Email) -> TsResult<Vec<Timesheet>> {
        let timesheets = self.timesheets.read();
        Ok(timesheets
            .values()
            .filter(|ts| ts.has_approver(&approver))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ts_models::{ApprovalRecord, TimesheetStatus};

    fn email(raw: &str) -> Email {
        Email::parse(raw).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 27).unwrap()
    }

    fn entry(hour: u32) -> TaskEntry {
        TaskEntry::new(
            "Work",
            "",
            day().and_hms_opt(hour, 0, 0).unwrap(),
            day().and_hms_opt(hour + 1, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_load() {
        let gateway = InMemoryGateway::new();
        let created = gateway
            .create_timesheet(42, email("dev@example.com"), DateScope::day(day()))
            .await
            .unwrap();

        assert_eq!(created.id, 1);
        let loaded = gateway.load_timesheet(created.id).await.unwrap().unwrap();
        assert_eq!(loaded, created);
        assert_eq!(gateway.load_timesheets(42).await.unwrap().len(), 1);
        assert!(gateway.load_timesheets(7).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_entry_crud() {
        let gateway = InMemoryGateway::new();
        let ts = gateway
            .create_timesheet(42, email("dev@example.com"), DateScope::day(day()))
            .await
            .unwrap();

        let first = gateway.create_task_entry(ts.id, entry(9)).await.unwrap();
        let second = gateway.create_task_entry(ts.id, entry(10)).await.unwrap();
        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));

        let mut renamed = first.clone();
        renamed.name = "Renamed".to_string();
        gateway.update_task_entry(ts.id, renamed).await.unwrap();

        gateway.delete_task_entry(ts.id, 2).await.unwrap();
        let stored = gateway.load_timesheet(ts.id).await.unwrap().unwrap();
        assert_eq!(stored.task_count(), 1);
        assert_eq!(stored.entries[0].name, "Renamed");

        let err = gateway.delete_task_entry(ts.id, 2).await.unwrap_err();
        assert_eq!(err.error_code(), "not_found");
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let gateway = InMemoryGateway::new();
        let ts = gateway
            .create_timesheet(42, email("dev@example.com"), DateScope::day(day()))
            .await
            .unwrap();
        gateway.create_task_entry(ts.id, entry(9)).await.unwrap();

        gateway.delete_timesheet(ts.id).await.unwrap();
        assert!(gateway.load_timesheet(ts.id).await.unwrap().is_none());
        assert!(gateway.delete_timesheet(ts.id).await.is_err());
    }

    #[tokio::test]
    async fn test_submission_and_decision_logs() {
        let gateway = InMemoryGateway::new();
        let ts = gateway
            .create_timesheet(42, email("dev@example.com"), DateScope::day(day()))
            .await
            .unwrap();

        let process_id = gateway
            .submit_timesheet(ts.id, vec![email("boss@example.com")])
            .await
            .unwrap();
        let submissions = gateway.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].process_id, process_id);

        gateway
            .record_approval_decision(
                ts.id,
                Decision::Rejected,
                vec![email("boss@example.com")],
                Some("Hours mismatch".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(gateway.decisions()[0].reason.as_deref(), Some("Hours mismatch"));

        assert!(gateway.submit_timesheet(999, vec![]).await.is_err());
    }

    #[tokio::test]
    async fn test_load_approvals_for() {
        let gateway = InMemoryGateway::new();
        let mut ts = gateway
            .create_timesheet(42, email("dev@example.com"), DateScope::day(day()))
            .await
            .unwrap();
        ts.approvers.push(email("boss@example.com"));
        gateway.save_timesheet(&ts).await.unwrap();

        assert_eq!(gateway.load_approvals_for(email("boss@example.com")).await.unwrap().len(), 1);
        assert!(gateway.load_approvals_for(email("other@example.com")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let candidates = vec![Identity::new(1, "Boss", email("boss@example.com"))];
        let gateway = InMemoryGateway::with_candidates(candidates.clone());
        gateway
            .create_timesheet(42, email("dev@example.com"), DateScope::day(day()))
            .await
            .unwrap();

        let json = serde_json::to_string(&gateway.snapshot()).unwrap();
        let restored = InMemoryGateway::from_snapshot(serde_json::from_str(&json).unwrap());

        assert_eq!(restored.load_approver_candidates().await.unwrap(), candidates);
        let next = restored
            .create_timesheet(43, email("dev2@example.com"), DateScope::day(day()))
            .await
            .unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn test_snapshot_rejects_duplicate_ids() {
        let ts = Timesheet::new(3, 42, email("dev@example.com"), DateScope::day(day()));
        let snapshot = Snapshot {
            timesheets: vec![ts.clone(), ts],
            approver_candidates: vec![],
        };
        let json = serde_json::to_string(&snapshot).unwrap();

        let err = Snapshot::from_json(&json).unwrap_err();
        assert!(matches!(err, GatewayError::DuplicateId(3)));
        assert!(Snapshot::from_json("{").is_err());
    }

    fn rejected_snapshot(ts: Timesheet) -> GatewayError {
        let json = serde_json::to_string(&Snapshot {
            timesheets: vec![ts],
            approver_candidates: vec![],
        })
        .unwrap();
        Snapshot::from_json(&json).unwrap_err()
    }

    #[test]
    fn test_snapshot_rejects_reversed_entry() {
        let mut ts = Timesheet::new(3, 42, email("dev@example.com"), DateScope::day(day()));
        let mut late = entry(9);
        late.end = day().and_hms_opt(8, 0, 0).unwrap();
        ts.entries.push(late);

        match rejected_snapshot(ts) {
            GatewayError::InvalidTimesheet { id, source } => {
                assert_eq!(id, 3);
                assert_eq!(source.error_code(), "invalid_interval");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_snapshot_rejects_rejected_without_reason() {
        let mut ts = Timesheet::new(3, 42, email("dev@example.com"), DateScope::day(day()));
        ts.entries.push(entry(9).with_id(1));
        ts.approvers.push(email("boss@example.com"));
        ts.approvals.push(ApprovalRecord::pending(3, email("boss@example.com"), 1));
        ts.cycle = 1;
        ts.status = TimesheetStatus::Rejected;

        let err = rejected_snapshot(ts);
        assert!(matches!(err, GatewayError::InvalidTimesheet { id: 3, .. }));
        assert!(err.to_string().contains("rejectionReason"));
    }

    #[test]
    fn test_snapshot_rejects_sent_without_approvers() {
        let mut ts = Timesheet::new(3, 42, email("dev@example.com"), DateScope::day(day()));
        ts.entries.push(entry(9).with_id(1));
        ts.cycle = 1;
        ts.status = TimesheetStatus::SentForApproval;

        match rejected_snapshot(ts) {
            GatewayError::InvalidTimesheet { source: TsError::Validation(errors), .. } => {
                assert!(errors.has_error("approvers"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_snapshot_rejects_reversed_range() {
        let json = r#"{
            "timesheets": [{
                "id": 3,
                "employeeId": 42,
                "employeeEmail": "dev@example.com",
                "scope": { "kind": "range", "range": { "start": "2025-01-31", "end": "2025-01-27" } },
                "rejectionReason": null
            }]
        }"#;
        let err = Snapshot::from_json(json).unwrap_err();
        assert!(matches!(err, GatewayError::Json(_)));
    }

    #[tokio::test]
    async fn test_snapshot_file_missing() {
        let err = Snapshot::load("/nonexistent/snapshot.json").await.unwrap_err();
        assert!(matches!(err, GatewayError::Io { .. }));
        assert_eq!(TsError::from(err).error_code(), "gateway_error");
    }
}
