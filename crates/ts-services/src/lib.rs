//! # ts-services
//!
//! Business logic for Timesheet Approvals RS.
//!
//! The lifecycle and router are synchronous and operate on one loaded
//! timesheet. The workflow wraps them with gateway load/save and is the
//! entry point callers use.
//!
//! ## Structure
//!
//! - `lifecycle` - State machine over a single timesheet
//! - `consensus` - Aggregate outcome of a review cycle
//! - `router` - Approver resolution and decision dispatch
//! - `workflow` - Async orchestration over a `TimesheetGateway`
//! - `params` - Input params for entry operations

pub mod consensus;
pub mod lifecycle;
pub mod params;
pub mod router;
pub mod workflow;

pub use consensus::{aggregate, Verdict};
pub use lifecycle::{AggregateState, DecisionOutcome, TimesheetLifecycle};
pub use params::TaskEntryParams;
pub use router::{resolve_approvers, ApprovalRouter, DispatchOutcome};
pub use workflow::{Submission, TimesheetWorkflow};
