//! Base contract system
//!
//! Contracts check a proposed transition before anything is mutated. Each
//! one reports the first violated guard as a typed [`TsError`].

use serde::{Deserialize, Serialize};
use ts_core::{Email, Id, TsError, TsResult};
use ts_models::Timesheet;

/// Field-level validation outcome
pub type ValidationResult = Result<(), ts_core::ValidationErrors>;

/// Something a caller may be allowed to do with a timesheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    View,
    EditEntries,
    Submit,
    Decide,
    Delete,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::View => "view",
            Capability::EditEntries => "edit_entries",
            Capability::Submit => "submit",
            Capability::Decide => "decide",
            Capability::Delete => "delete",
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            Capability::View => "view",
            Capability::EditEntries => "edit entries of",
            Capability::Submit => "submit",
            Capability::Decide => "decide on",
            Capability::Delete => "delete",
        }
    }
}

/// Authorization predicate supplied by the caller at the workflow boundary
pub trait Capabilities: Send + Sync {
    fn can(&self, capability: Capability, timesheet: &Timesheet) -> bool;

    /// Whether the caller may record decisions under `approver`'s name
    ///
    /// Plain predicates carry no identity and answer yes.
    fn acts_for(&self, _approver: &Email) -> bool {
        true
    }

    /// Fail with `Forbidden` unless `capability` is granted
    fn ensure(&self, capability: Capability, timesheet: &Timesheet) -> TsResult<()> {
        if self.can(capability, timesheet) {
            Ok(())
        } else {
            Err(TsError::Forbidden {
                message: format!(
                    "You are not allowed to {} timesheet {}",
                    capability.verb(),
                    timesheet.id
                ),
            })
        }
    }
}

impl<F> Capabilities for F
where
    F: Fn(Capability, &Timesheet) -> bool + Send + Sync,
{
    fn can(&self, capability: Capability, timesheet: &Timesheet) -> bool {
        self(capability, timesheet)
    }
}

/// Default policy: owners manage their own timesheets, assigned approvers decide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub employee_id: Option<Id>,
    pub email: Option<Email>,
    pub admin: bool,
}

impl Actor {
    pub fn employee(employee_id: Id, email: Email) -> Self {
        Self {
            employee_id: Some(employee_id),
            email: Some(email),
            admin: false,
        }
    }

    pub fn approver(email: Email) -> Self {
        Self {
            employee_id: None,
            email: Some(email),
            admin: false,
        }
    }

    /// Trusted local caller, e.g. the CLI
    pub fn system() -> Self {
        Self {
            employee_id: None,
            email: None,
            admin: true,
        }
    }

    fn owns(&self, timesheet: &Timesheet) -> bool {
        self.employee_id == Some(timesheet.employee_id)
    }

    fn assigned_to(&self, timesheet: &Timesheet) -> bool {
        self.email
            .as_ref()
            .map(|email| timesheet.has_approver(email))
            .unwrap_or(false)
    }
}

impl Capabilities for Actor {
    fn can(&self, capability: Capability, timesheet: &Timesheet) -> bool {
        if self.admin {
            return true;
        }
        match capability {
            Capability::View => self.owns(timesheet) || self.assigned_to(timesheet),
            Capability::EditEntries | Capability::Submit | Capability::Delete => {
                self.owns(timesheet)
            }
            Capability::Decide => self.assigned_to(timesheet),
        }
    }

    fn acts_for(&self, approver: &Email) -> bool {
        self.admin || self.email.as_ref() == Some(approver)
    }
}

/// Base contract trait
pub trait Contract<T>: Send + Sync {
    /// Check every guard for `target`, failing on the first violation
    fn validate(&self, target: &T) -> TsResult<()>;
}
