//! Workflow entry point
//!
//! Every mutation follows the same shape: load the timesheet from the
//! gateway, check the caller's capability, apply the lifecycle to the loaded
//! copy, then persist. A failed guard never reaches the gateway. Submissions
//! and decisions are announced before the copy is saved, so a failed
//! announcement leaves the stored timesheet untouched.

use std::sync::Arc;

use tracing::{debug, info, warn};
use ts_contracts::{Capabilities, Capability};
use ts_core::config::EngineConfig;
use ts_core::{DateScope, Email, Id, Page, TsError, TsResult};
use ts_db::{ProcessId, TimesheetGateway};
use ts_models::{
    ApprovalView, Decision, Entity, TaskEntry, TaskRow, Timesheet, TimesheetStatus,
    TimesheetSummary,
};
use ts_queries::{presets, ApproverTab, SearchQuery, SearchQueryBuilder};

use crate::lifecycle::TimesheetLifecycle;
use crate::params::TaskEntryParams;
use crate::router::{resolve_approvers, ApprovalRouter, DispatchOutcome};

/// A committed submission
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub process_id: ProcessId,
    pub timesheet: Timesheet,
}

pub struct TimesheetWorkflow {
    gateway: Arc<dyn TimesheetGateway>,
    config: EngineConfig,
}

impl TimesheetWorkflow {
    pub fn new(gateway: Arc<dyn TimesheetGateway>, config: EngineConfig) -> Self {
        Self { gateway, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Employee list query with the configured page size
    pub fn employee_query(&self) -> SearchQueryBuilder<TimesheetStatus> {
        presets::employee_view(self.config.page_size)
    }

    /// Approver tab query with the configured page size
    pub fn approver_query(&self, tab: ApproverTab) -> SearchQueryBuilder<Decision> {
        presets::approver_tab(tab, self.config.page_size)
    }

    async fn load(&self, id: Id) -> TsResult<Timesheet> {
        self.gateway
            .load_timesheet(id)
            .await?
            .ok_or_else(|| TsError::not_found(Timesheet::TYPE_NAME, id))
    }

    fn authorize<C: Capabilities + ?Sized>(
        actor: &C,
        capability: Capability,
        timesheet: &Timesheet,
    ) -> TsResult<()> {
        actor.ensure(capability, timesheet).map_err(|err| {
            warn!(
                timesheet_id = timesheet.id,
                capability = capability.as_str(),
                "Capability denied"
            );
            err
        })
    }

    // Employee side

    pub async fn create_timesheet<C: Capabilities + ?Sized>(
        &self,
        actor: &C,
        employee_id: Id,
        employee_email: Email,
        scope: DateScope,
    ) -> TsResult<Timesheet> {
        let draft = Timesheet::new(0, employee_id, employee_email.clone(), scope);
        Self::authorize(actor, Capability::EditEntries, &draft)?;

        let timesheet = self
            .gateway
            .create_timesheet(employee_id, employee_email, scope)
            .await?;
        info!(timesheet_id = timesheet.id, employee_id, %scope, "Timesheet created");
        Ok(timesheet)
    }

    /// The employee's timesheets the actor may view
    pub async fn timesheets_for<C: Capabilities + ?Sized>(
        &self,
        actor: &C,
        employee_id: Id,
    ) -> TsResult<Vec<Timesheet>> {
        let timesheets = self.gateway.load_timesheets(employee_id).await?;
        Ok(timesheets
            .into_iter()
            .filter(|ts| actor.can(Capability::View, ts))
            .collect())
    }

    pub async fn summary<C: Capabilities + ?Sized>(&self, actor: &C, id: Id) -> TsResult<TimesheetSummary> {
        let timesheet = self.load(id).await?;
        Self::authorize(actor, Capability::View, &timesheet)?;
        TimesheetSummary::try_from(&timesheet)
    }

    pub async fn add_entry<C: Capabilities + ?Sized>(
        &self,
        actor: &C,
        timesheet_id: Id,
        params: TaskEntryParams,
    ) -> TsResult<TaskEntry> {
        let mut timesheet = self.load(timesheet_id).await?;
        let entry = params.into_entry()?;

        let entry = TimesheetLifecycle::new(actor, &self.config).add_entry(&mut timesheet, entry)?;
        self.gateway.create_task_entry(timesheet_id, entry).await
    }

    pub async fn update_entry<C: Capabilities + ?Sized>(
        &self,
        actor: &C,
        timesheet_id: Id,
        entry_id: Id,
        params: TaskEntryParams,
    ) -> TsResult<TaskEntry> {
        let mut timesheet = self.load(timesheet_id).await?;
        let mut entry = timesheet
            .entry(entry_id)
            .cloned()
            .ok_or_else(|| TsError::not_found(TaskEntry::TYPE_NAME, entry_id))?;
        params.apply_to(&mut entry)?;

        let entry = TimesheetLifecycle::new(actor, &self.config).update_entry(&mut timesheet, entry)?;
        self.gateway.update_task_entry(timesheet_id, entry).await
    }

    pub async fn delete_entry<C: Capabilities + ?Sized>(
        &self,
        actor: &C,
        timesheet_id: Id,
        entry_id: Id,
    ) -> TsResult<()> {
        let mut timesheet = self.load(timesheet_id).await?;
        TimesheetLifecycle::new(actor, &self.config).remove_entry(&mut timesheet, entry_id)?;
        self.gateway.delete_task_entry(timesheet_id, entry_id).await
    }

    /// Delete an unsent timesheet together with its entries
    pub async fn delete_timesheet<C: Capabilities + ?Sized>(&self, actor: &C, id: Id) -> TsResult<()> {
        let timesheet = self.load(id).await?;
        TimesheetLifecycle::new(actor, &self.config).ensure_deletable(&timesheet)?;
        self.gateway.delete_timesheet(id).await?;
        info!(timesheet_id = id, "Timesheet deleted");
        Ok(())
    }

    /// Send a timesheet to the selected approvers
    ///
    /// `selected` are raw identities; each must name an approver candidate.
    pub async fn submit<C, S>(&self, actor: &C, id: Id, selected: &[S]) -> TsResult<Submission>
    where
        C: Capabilities + ?Sized,
        S: AsRef<str>,
    {
        let mut timesheet = self.load(id).await?;
        let lifecycle = TimesheetLifecycle::new(actor, &self.config);
        let candidates = self.gateway.load_approver_candidates().await?;

        let approvers = match resolve_approvers(&candidates, selected) {
            Ok(approvers) => approvers,
            Err(err) => {
                // Guards on the timesheet itself are reported first
                return match lifecycle.submit(&mut timesheet.clone(), Vec::new()) {
                    Err(TsError::EmptyApproverSet) | Ok(()) => Err(err),
                    Err(earlier) => Err(earlier),
                };
            }
        };

        lifecycle.submit(&mut timesheet, approvers)?;
        let process_id = self
            .gateway
            .submit_timesheet(id, timesheet.approvers.clone())
            .await?;
        self.gateway.save_timesheet(&timesheet).await?;

        info!(timesheet_id = id, %process_id, cycle = timesheet.cycle, "Submission committed");
        Ok(Submission {
            process_id,
            timesheet,
        })
    }

    // Approver side

    /// Record a decision by `approver`
    ///
    /// A deferred rejection returns [`DispatchOutcome::ReasonRequired`]
    /// without touching the gateway.
    pub async fn decide<C: Capabilities + ?Sized>(
        &self,
        actor: &C,
        id: Id,
        approver: &Email,
        decision: Decision,
        reason: Option<&str>,
    ) -> TsResult<DispatchOutcome> {
        let mut timesheet = self.load(id).await?;
        let outcome =
            ApprovalRouter::new(actor, &self.config).dispatch(&mut timesheet, approver, decision, reason)?;

        if let DispatchOutcome::Applied { decision, reason, .. } = &outcome {
            self.gateway
                .record_approval_decision(id, *decision, timesheet.approvers.clone(), reason.clone())
                .await?;
            self.gateway.save_timesheet(&timesheet).await?;
            debug!(timesheet_id = id, %approver, decision = decision.label(), "Decision committed");
        }

        Ok(outcome)
    }

    /// One page of the approver's view, limited to what the actor may view
    pub async fn approvals_for<C: Capabilities + ?Sized>(
        &self,
        actor: &C,
        approver: &Email,
        query: &SearchQuery<Decision>,
    ) -> TsResult<Page<ApprovalView>> {
        let timesheets = self.gateway.load_approvals_for(approver.clone()).await?;
        let mut views = Vec::with_capacity(timesheets.len());
        for ts in timesheets.iter().filter(|ts| actor.can(Capability::View, ts)) {
            if let Some(view) = ApprovalView::for_approver(ts, approver)? {
                views.push(view);
            }
        }
        query.filter(&views)
    }

    /// One page of the employee's timesheet list
    pub async fn search_timesheets<C: Capabilities + ?Sized>(
        &self,
        actor: &C,
        employee_id: Id,
        query: &SearchQuery<TimesheetStatus>,
    ) -> TsResult<Page<TimesheetSummary>> {
        let timesheets = self.timesheets_for(actor, employee_id).await?;
        let page = query.filter(&timesheets)?;
        page.try_map(|ts| TimesheetSummary::try_from(&ts))
    }

    /// Export rows for one timesheet, in entry order
    pub async fn export_rows<C: Capabilities + ?Sized>(&self, actor: &C, id: Id) -> TsResult<Vec<TaskRow>> {
        let timesheet = self.load(id).await?;
        Self::authorize(actor, Capability::View, &timesheet)?;
        TaskRow::for_timesheet(&timesheet)
    }
}
