//! Submit contract for timesheets

use ts_core::{Email, TsError, TsResult};
use ts_models::Timesheet;

use crate::base::{Capabilities, Capability, Contract};

/// A proposed submission
pub struct SubmitData<'t> {
    pub timesheet: &'t Timesheet,
    pub approvers: &'t [Email],
}

/// Contract for sending a timesheet out for approval
pub struct SubmitTimesheetContract<'a, C: Capabilities + ?Sized> {
    actor: &'a C,
}

impl<'a, C: Capabilities + ?Sized> SubmitTimesheetContract<'a, C> {
    pub fn new(actor: &'a C) -> Self {
        Self { actor }
    }

    fn validate_status(&self, timesheet: &Timesheet) -> TsResult<()> {
        if timesheet.status.can_submit() {
            Ok(())
        } else {
            Err(TsError::InvalidTransition {
                timesheet_id: timesheet.id,
                action: "submit",
                status: timesheet.status.label(),
            })
        }
    }
}

impl<'a, 't, C: Capabilities + ?Sized> Contract<SubmitData<'t>> for SubmitTimesheetContract<'a, C> {
    fn validate(&self, target: &SubmitData<'t>) -> TsResult<()> {
        let timesheet = target.timesheet;

        self.actor.ensure(Capability::Submit, timesheet)?;
        self.validate_status(timesheet)?;

        // An empty timesheet fails regardless of the approver set
        if timesheet.entries.is_empty() {
            return Err(TsError::EmptyTimesheet {
                timesheet_id: timesheet.id,
            });
        }
        if target.approvers.is_empty() {
            return Err(TsError::EmptyApproverSet);
        }

        Ok(())
    }
}
