//! # ts-db
//!
//! Collaborator seam for Timesheet Approvals RS.
//!
//! This crate provides:
//!
//! - The async [`TimesheetGateway`] trait the workflow loads from and saves to
//! - An in-memory implementation backed by `parking_lot` locks
//! - JSON snapshots of the in-memory state
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ts_db::{InMemoryGateway, TimesheetGateway};
//!
//! let gateway: Arc<dyn TimesheetGateway> = Arc::new(InMemoryGateway::new());
//! let timesheets = gateway.load_timesheets(42).await?;
//! ```

pub mod error;
pub mod gateway;
pub mod memory;

// Re-exports
pub use error::{GatewayError, GatewayResult};
pub use gateway::{ProcessId, TimesheetGateway};
#[cfg(any(test, feature = "mock"))]
pub use gateway::MockTimesheetGateway;
pub use memory::{DecisionLog, InMemoryGateway, Snapshot, SubmissionLog};
