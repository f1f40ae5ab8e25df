//! # ts-contracts
//!
//! Transition guards for Timesheet Approvals RS.
//!
//! Contracts validate a proposed lifecycle transition before any state is
//! touched, and check the caller's capabilities for the timesheet involved.

pub mod base;
pub mod timesheets;

pub use base::*;
