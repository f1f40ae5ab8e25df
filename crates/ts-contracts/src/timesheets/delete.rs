//! Delete contract for timesheets

use ts_core::{TsError, TsResult};
use ts_models::Timesheet;

use crate::base::{Capabilities, Capability, Contract};

/// Contract for deleting a timesheet and, with it, all of its entries
pub struct DeleteTimesheetContract<'a, C: Capabilities + ?Sized> {
    actor: &'a C,
}

impl<'a, C: Capabilities + ?Sized> DeleteTimesheetContract<'a, C> {
    pub fn new(actor: &'a C) -> Self {
        Self { actor }
    }
}

impl<'a, C: Capabilities + ?Sized> Contract<Timesheet> for DeleteTimesheetContract<'a, C> {
    fn validate(&self, timesheet: &Timesheet) -> TsResult<()> {
        self.actor.ensure(Capability::Delete, timesheet)?;

        if !timesheet.status.is_editable() {
            return Err(TsError::TimesheetLocked {
                timesheet_id: timesheet.id,
                status: timesheet.status.label(),
            });
        }

        Ok(())
    }
}
