//! Timesheet status and per-approver decisions
//!
//! One closed enumeration with a single canonical label per state. Older
//! clients spelled the same states several ways; [`TimesheetStatus::from_label`]
//! maps those spellings at the boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Aggregate lifecycle state of a timesheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimesheetStatus {
    #[default]
    NotSent,
    SentForApproval,
    Approved,
    Rejected,
}

/// Legacy spellings seen on the wire, mapped to canonical states
const LEGACY_LABELS: &[(&str, TimesheetStatus)] = &[
    ("not sent", TimesheetStatus::NotSent),
    ("notsent", TimesheetStatus::NotSent),
    ("draft", TimesheetStatus::NotSent),
    ("send for approval", TimesheetStatus::SentForApproval),
    ("sent for approval", TimesheetStatus::SentForApproval),
    ("sentforapproval", TimesheetStatus::SentForApproval),
    ("pending", TimesheetStatus::SentForApproval),
    ("submitted", TimesheetStatus::SentForApproval),
    ("approved", TimesheetStatus::Approved),
    ("rejected", TimesheetStatus::Rejected),
];

impl TimesheetStatus {
    pub const ALL: [TimesheetStatus; 4] = [
        TimesheetStatus::NotSent,
        TimesheetStatus::SentForApproval,
        TimesheetStatus::Approved,
        TimesheetStatus::Rejected,
    ];

    /// Canonical display label
    pub fn label(&self) -> &'static str {
        match self {
            TimesheetStatus::NotSent => "Not Sent",
            TimesheetStatus::SentForApproval => "Sent for Approval",
            TimesheetStatus::Approved => "Approved",
            TimesheetStatus::Rejected => "Rejected",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimesheetStatus::NotSent => "not_sent",
            TimesheetStatus::SentForApproval => "sent_for_approval",
            TimesheetStatus::Approved => "approved",
            TimesheetStatus::Rejected => "rejected",
        }
    }

    /// Parse a canonical key or any known legacy label, ignoring case
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase().replace(['_', '-'], " ");
        LEGACY_LABELS
            .iter()
            .find(|(known, _)| *known == normalized)
            .map(|(_, status)| *status)
    }

    /// Entries may only change while the timesheet has not been sent
    pub fn is_editable(&self) -> bool {
        matches!(self, TimesheetStatus::NotSent)
    }

    pub fn can_submit(&self) -> bool {
        matches!(self, TimesheetStatus::NotSent | TimesheetStatus::Rejected)
    }

    pub fn awaits_decision(&self) -> bool {
        matches!(self, TimesheetStatus::SentForApproval)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TimesheetStatus::Approved)
    }
}

impl fmt::Display for TimesheetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for TimesheetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("Unknown timesheet status: {}", s))
    }
}

/// One approver's decision within a review cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl Decision {
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Pending => "Pending",
            Decision::Approved => "Approved",
            Decision::Rejected => "Rejected",
        }
    }

    pub fn is_final(&self) -> bool {
        !matches!(self, Decision::Pending)
    }

    /// Timesheet state a final decision settles into
    pub fn outcome(&self) -> Option<TimesheetStatus> {
        match self {
            Decision::Pending => None,
            Decision::Approved => Some(TimesheetStatus::Approved),
            Decision::Rejected => Some(TimesheetStatus::Rejected),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Decision::Pending),
            "approved" | "approve" => Ok(Decision::Approved),
            "rejected" | "reject" => Ok(Decision::Rejected),
            _ => Err(format!("Unknown decision: {}", s)),
        }
    }
}
