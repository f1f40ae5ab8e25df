//! # ts-models
//!
//! Domain models for Timesheet Approvals RS.
//!
//! Each model implements the core traits from `ts-core` (Entity, Identifiable).
//! Durations and counts are derived from task entries on every read.

pub use ts_core::traits::{Entity, Id, Identifiable};

pub mod approval;
pub mod duration;
pub mod identity;
pub mod status;
pub mod task_entry;
pub mod timesheet;
pub mod views;

// Re-exports for convenience
pub use approval::{normalize_reason, ApprovalRecord, ReviewCycle, DEFAULT_REASON_SENTINEL};
pub use duration::{entry_duration, total_duration};
pub use identity::Identity;
pub use status::{Decision, TimesheetStatus};
pub use task_entry::TaskEntry;
pub use timesheet::Timesheet;
pub use views::{ApprovalView, TaskRow, TimesheetSummary};
