//! Core error types for Timesheet Approvals RS
//!
//! Every guard violation in the workflow engine maps to one variant of
//! [`TsError`]. Presentation collaborators switch on [`TsError::error_code`]
//! rather than on message text.

use std::collections::HashMap;
use thiserror::Error;

use crate::traits::Id;

/// Core error type for all workflow operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TsError {
    #[error("Invalid interval: end {end} is not after start {start}")]
    InvalidInterval { start: String, end: String },

    #[error("Timesheet {timesheet_id} has no task entries")]
    EmptyTimesheet { timesheet_id: Id },

    #[error("Timesheet {timesheet_id} is locked while {status}")]
    TimesheetLocked {
        timesheet_id: Id,
        status: &'static str,
    },

    #[error("Unknown approver: {identity}")]
    UnknownApprover { identity: String },

    #[error("At least one approver is required")]
    EmptyApproverSet,

    #[error("A reason is required to reject timesheet {timesheet_id}")]
    MissingRejectionReason { timesheet_id: Id },

    #[error("Invalid date range: {end} is before {start}")]
    InvalidDateRange { start: String, end: String },

    #[error("Cannot {action} timesheet {timesheet_id} while {status}")]
    InvalidTransition {
        timesheet_id: Id,
        action: &'static str,
        status: &'static str,
    },

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TsError {
    pub fn not_found(entity: &'static str, id: Id) -> Self {
        TsError::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }

    pub fn unknown_approver(identity: impl Into<String>) -> Self {
        TsError::UnknownApprover {
            identity: identity.into(),
        }
    }

    /// Stable machine-readable kind, one per variant
    pub fn error_code(&self) -> &'static str {
        match self {
            TsError::InvalidInterval { .. } => "invalid_interval",
            TsError::EmptyTimesheet { .. } => "empty_timesheet",
            TsError::TimesheetLocked { .. } => "timesheet_locked",
            TsError::UnknownApprover { .. } => "unknown_approver",
            TsError::EmptyApproverSet => "empty_approver_set",
            TsError::MissingRejectionReason { .. } => "missing_rejection_reason",
            TsError::InvalidDateRange { .. } => "invalid_date_range",
            TsError::InvalidTransition { .. } => "invalid_transition",
            TsError::NotFound { .. } => "not_found",
            TsError::Forbidden { .. } => "forbidden",
            TsError::Validation(_) => "validation_failed",
            TsError::Gateway(_) => "gateway_error",
            TsError::Config(_) => "configuration_error",
        }
    }

    /// Whether the caller can fix the input and retry the same call
    pub fn is_user_error(&self) -> bool {
        !matches!(self, TsError::Gateway(_) | TsError::Config(_))
    }
}

/// Validation errors collection, keyed by field
#[derive(Error, Debug, Default, Clone, PartialEq)]
#[error("Validation errors: {errors:?}")]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: HashMap<String, Vec<String>>,
    /// Base errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        let mut fields: Vec<_> = self.errors.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        for (field, field_messages) in fields {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }

    /// Convert into a result, failing when any error was recorded
    pub fn into_result(self) -> Result<(), TsError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(TsError::Validation(self))
        }
    }
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(source: validator::ValidationErrors) -> Self {
        let mut errors = ValidationErrors::new();
        for (field, field_errors) in source.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("is invalid ({})", error.code));
                errors.add(field, message);
            }
        }
        errors
    }
}
