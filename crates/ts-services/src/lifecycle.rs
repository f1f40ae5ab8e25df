//! Timesheet lifecycle
//!
//! The state machine over one timesheet:
//!
//! ```text
//! NotSent --submit--> SentForApproval --decide--> Approved
//!                          ^                 \--> Rejected
//!                          \----resubmit---------/
//! ```
//!
//! Every operation runs its contract before touching the timesheet, so a
//! failed call leaves it exactly as it was.

use chrono::Utc;
use tracing::{debug, info};
use ts_contracts::timesheets::{
    DecisionData, DeleteTimesheetContract, EntryChange, RecordDecisionContract, SubmitData,
    SubmitTimesheetContract, TaskEntryContract,
};
use ts_contracts::{Capabilities, Contract};
use ts_core::config::EngineConfig;
use ts_core::{Email, Id, TsError, TsResult};
use ts_models::{
    normalize_reason, ApprovalRecord, Decision, Entity, ReviewCycle, TaskEntry, Timesheet,
    TimesheetStatus,
};

use crate::consensus::aggregate;

/// Externally visible state after a decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateState {
    pub status: TimesheetStatus,
    pub rejection_reason: Option<String>,
    /// Approvers who have not acted in this cycle
    pub pending: usize,
}

impl AggregateState {
    pub fn of(timesheet: &Timesheet) -> Self {
        Self {
            status: timesheet.status,
            rejection_reason: timesheet.rejection_reason.clone(),
            pending: timesheet.pending_approvers().count(),
        }
    }
}

/// Result of [`TimesheetLifecycle::record_decision`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// A rejection arrived without a reason; nothing changed. Ask for one
    /// and call again.
    ReasonRequired,
    Recorded(AggregateState),
}

pub struct TimesheetLifecycle<'a, C: Capabilities + ?Sized> {
    actor: &'a C,
    config: &'a EngineConfig,
}

impl<'a, C: Capabilities + ?Sized> TimesheetLifecycle<'a, C> {
    pub fn new(actor: &'a C, config: &'a EngineConfig) -> Self {
        Self { actor, config }
    }

    // Entry operations

    /// Append an entry, assigning the next free id when it has none
    pub fn add_entry(&self, timesheet: &mut Timesheet, mut entry: TaskEntry) -> TsResult<TaskEntry> {
        TaskEntryContract::new(self.actor).validate(&(&*timesheet, EntryChange::Add(&entry)))?;

        if entry.id.map_or(true, |id| timesheet.entry(id).is_some()) {
            entry.id = Some(timesheet.next_entry_id());
        }
        timesheet.entries.push(entry.clone());
        debug!(timesheet_id = timesheet.id, entry_id = ?entry.id, "Added task entry");
        Ok(entry)
    }

    /// Replace the entry with the same id
    pub fn update_entry(&self, timesheet: &mut Timesheet, entry: TaskEntry) -> TsResult<TaskEntry> {
        TaskEntryContract::new(self.actor).validate(&(&*timesheet, EntryChange::Update(&entry)))?;

        let entry_id = entry.id.unwrap_or_default();
        let position = timesheet
            .entry_position(entry_id)
            .ok_or_else(|| TsError::not_found(TaskEntry::TYPE_NAME, entry_id))?;
        timesheet.entries[position] = entry.clone();
        debug!(timesheet_id = timesheet.id, entry_id, "Updated task entry");
        Ok(entry)
    }

    pub fn remove_entry(&self, timesheet: &mut Timesheet, entry_id: Id) -> TsResult<TaskEntry> {
        TaskEntryContract::new(self.actor).validate(&(&*timesheet, EntryChange::Remove(entry_id)))?;

        let position = timesheet
            .entry_position(entry_id)
            .ok_or_else(|| TsError::not_found(TaskEntry::TYPE_NAME, entry_id))?;
        let removed = timesheet.entries.remove(position);
        debug!(timesheet_id = timesheet.id, entry_id, "Removed task entry");
        Ok(removed)
    }

    /// Check that the timesheet may be deleted; the caller removes it
    pub fn ensure_deletable(&self, timesheet: &Timesheet) -> TsResult<()> {
        DeleteTimesheetContract::new(self.actor).validate(timesheet)
    }

    // Transitions

    /// Send the timesheet to `approvers`, opening a fresh review cycle
    ///
    /// Duplicate approvers collapse. On resubmission the previous cycle is
    /// moved to `history` along with its rejection reason.
    pub fn submit(&self, timesheet: &mut Timesheet, approvers: Vec<Email>) -> TsResult<()> {
        let mut unique: Vec<Email> = Vec::with_capacity(approvers.len());
        for approver in approvers {
            if !unique.contains(&approver) {
                unique.push(approver);
            }
        }

        SubmitTimesheetContract::new(self.actor).validate(&SubmitData {
            timesheet,
            approvers: &unique,
        })?;

        if timesheet.cycle > 0 {
            let closed = ReviewCycle {
                cycle: timesheet.cycle,
                outcome: timesheet.status,
                reason: timesheet.rejection_reason.take(),
                records: std::mem::take(&mut timesheet.approvals),
            };
            timesheet.history.push(closed);
        }

        timesheet.cycle += 1;
        timesheet.approvals = unique
            .iter()
            .map(|approver| ApprovalRecord::pending(timesheet.id, approver.clone(), timesheet.cycle))
            .collect();
        timesheet.approvers = unique;
        timesheet.rejection_reason = None;
        timesheet.status = TimesheetStatus::SentForApproval;

        info!(
            timesheet_id = timesheet.id,
            cycle = timesheet.cycle,
            approvers = timesheet.approvers.len(),
            "Timesheet submitted"
        );
        Ok(())
    }

    /// Record one approver's decision
    ///
    /// A rejection without a usable reason is deferred: the timesheet is
    /// left untouched and [`DecisionOutcome::ReasonRequired`] is returned.
    pub fn record_decision(
        &self,
        timesheet: &mut Timesheet,
        approver: &Email,
        decision: Decision,
        reason: Option<&str>,
    ) -> TsResult<DecisionOutcome> {
        let reason = normalize_reason(reason, &self.config.reason_sentinel);
        let contract = RecordDecisionContract::new(self.actor);
        let data = DecisionData {
            timesheet,
            approver,
            decision,
            reason: reason.as_deref(),
        };

        contract.validate_without_reason(&data)?;
        if contract.reason_missing(&data) {
            debug!(timesheet_id = timesheet.id, %approver, "Rejection deferred until a reason is given");
            return Ok(DecisionOutcome::ReasonRequired);
        }

        let kept_reason = match decision {
            Decision::Rejected => reason,
            _ => None,
        };
        let record = timesheet
            .approvals
            .iter_mut()
            .find(|r| &r.approver == approver)
            .ok_or_else(|| TsError::unknown_approver(approver.as_str()))?;
        record.decide(decision, kept_reason, Utc::now());

        if let Some(verdict) = aggregate(self.config.consensus, &timesheet.approvals) {
            timesheet.status = verdict.status;
            timesheet.rejection_reason = match verdict.status {
                TimesheetStatus::Rejected => verdict.reason,
                _ => None,
            };
            info!(
                timesheet_id = timesheet.id,
                status = timesheet.status.as_str(),
                rule = self.config.consensus.as_str(),
                "Review cycle settled"
            );
        }

        Ok(DecisionOutcome::Recorded(AggregateState::of(timesheet)))
    }

    /// Like [`record_decision`](Self::record_decision), but a rejection
    /// without a reason is an error
    pub fn record_decision_strict(
        &self,
        timesheet: &mut Timesheet,
        approver: &Email,
        decision: Decision,
        reason: Option<&str>,
    ) -> TsResult<AggregateState> {
        match self.record_decision(timesheet, approver, decision, reason)? {
            DecisionOutcome::Recorded(state) => Ok(state),
            DecisionOutcome::ReasonRequired => Err(TsError::MissingRejectionReason {
                timesheet_id: timesheet.id,
            }),
        }
    }
}
