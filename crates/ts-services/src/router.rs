//! Approval router
//!
//! Resolves the approvers chosen at submission against the candidate pool
//! and routes each approver's decision into the lifecycle.

use tracing::{debug, warn};
use ts_contracts::Capabilities;
use ts_core::config::EngineConfig;
use ts_core::{Email, TsError, TsResult};
use ts_models::{Decision, Identity, Timesheet};

use crate::lifecycle::{AggregateState, DecisionOutcome, TimesheetLifecycle};

/// Map selected identities onto candidate emails
///
/// Matching is case-insensitive. Order of first selection is kept and
/// duplicates collapse.
pub fn resolve_approvers<S: AsRef<str>>(pool: &[Identity], selected: &[S]) -> TsResult<Vec<Email>> {
    if selected.is_empty() {
        return Err(TsError::EmptyApproverSet);
    }

    let mut resolved: Vec<Email> = Vec::with_capacity(selected.len());
    for raw in selected {
        let raw = raw.as_ref();
        let email = Email::parse(raw).map_err(|_| TsError::unknown_approver(raw))?;
        if !pool.iter().any(|candidate| candidate.email == email) {
            warn!(approver = %email, "Approver is not a candidate");
            return Err(TsError::unknown_approver(email.as_str()));
        }
        if !resolved.contains(&email) {
            resolved.push(email);
        }
    }

    debug!(approvers = resolved.len(), "Resolved approvers");
    Ok(resolved)
}

/// Outcome of routing one decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A rejection without a reason; prompt the approver and dispatch again
    ReasonRequired,
    /// The decision was recorded on the timesheet
    Applied {
        decision: Decision,
        reason: Option<String>,
        state: AggregateState,
    },
}

impl DispatchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, DispatchOutcome::Applied { .. })
    }

    pub fn state(&self) -> Option<&AggregateState> {
        match self {
            DispatchOutcome::Applied { state, .. } => Some(state),
            DispatchOutcome::ReasonRequired => None,
        }
    }
}

pub struct ApprovalRouter<'a, C: Capabilities + ?Sized> {
    lifecycle: TimesheetLifecycle<'a, C>,
}

impl<'a, C: Capabilities + ?Sized> ApprovalRouter<'a, C> {
    pub fn new(actor: &'a C, config: &'a EngineConfig) -> Self {
        Self {
            lifecycle: TimesheetLifecycle::new(actor, config),
        }
    }

    /// Record `approver`'s decision on `timesheet` and return the new
    /// aggregate state
    pub fn dispatch(
        &self,
        timesheet: &mut Timesheet,
        approver: &Email,
        decision: Decision,
        reason: Option<&str>,
    ) -> TsResult<DispatchOutcome> {
        match self.lifecycle.record_decision(timesheet, approver, decision, reason)? {
            DecisionOutcome::ReasonRequired => Ok(DispatchOutcome::ReasonRequired),
            DecisionOutcome::Recorded(state) => {
                let reason = timesheet
                    .approval_for(approver)
                    .and_then(|record| record.reason.clone());
                Ok(DispatchOutcome::Applied {
                    decision,
                    reason,
                    state,
                })
            }
        }
    }
}
