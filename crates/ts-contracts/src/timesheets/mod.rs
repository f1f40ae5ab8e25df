//! Timesheet contracts
//!
//! One contract per lifecycle transition:
//! - entry add / update / remove
//! - submit
//! - record decision
//! - delete

mod decision;
mod delete;
mod entry;
mod submit;

pub use decision::{DecisionData, RecordDecisionContract};
pub use delete::DeleteTimesheetContract;
pub use entry::{EntryChange, TaskEntryContract};
pub use submit::{SubmitData, SubmitTimesheetContract};
