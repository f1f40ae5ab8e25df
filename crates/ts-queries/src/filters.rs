//! Filters
//!
//! Each predicate is optional; present predicates combine with AND.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_core::{DateRange, Id, TsResult};
use ts_models::{ApprovalView, Decision, Timesheet, TimesheetStatus};

/// Fields free-text search can look at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    EmployeeEmail,
    TaskName,
    TaskDescription,
    TimesheetId,
}

impl SearchField {
    pub const ALL: [SearchField; 4] = [
        SearchField::EmployeeEmail,
        SearchField::TaskName,
        SearchField::TaskDescription,
        SearchField::TimesheetId,
    ];
}

/// Anything the engine can filter
pub trait Searchable {
    /// Value the status predicate compares against
    type Status: Copy + PartialEq;

    fn search_id(&self) -> Id;
    fn search_date(&self) -> NaiveDate;
    fn search_status(&self) -> Self::Status;
    /// Text values of `field`; empty when the item has none
    fn field_values(&self, field: SearchField) -> Vec<String>;
}

impl Searchable for Timesheet {
    type Status = TimesheetStatus;

    fn search_id(&self) -> Id {
        self.id
    }

    fn search_date(&self) -> NaiveDate {
        self.date()
    }

    fn search_status(&self) -> TimesheetStatus {
        self.status
    }

    fn field_values(&self, field: SearchField) -> Vec<String> {
        match field {
            SearchField::EmployeeEmail => vec![self.employee_email.to_string()],
            SearchField::TaskName => self.entries.iter().map(|e| e.name.clone()).collect(),
            SearchField::TaskDescription => {
                self.entries.iter().map(|e| e.description.clone()).collect()
            }
            SearchField::TimesheetId => vec![self.id.to_string()],
        }
    }
}

/// On the approver side the status predicate is the approver's own decision
impl Searchable for ApprovalView {
    type Status = Decision;

    fn search_id(&self) -> Id {
        self.timesheet_id
    }

    fn search_date(&self) -> NaiveDate {
        self.date()
    }

    fn search_status(&self) -> Decision {
        self.decision
    }

    fn field_values(&self, field: SearchField) -> Vec<String> {
        match field {
            SearchField::EmployeeEmail => vec![self.employee_email.to_string()],
            SearchField::TaskName => self.task_names.clone(),
            SearchField::TaskDescription => self.task_descriptions.clone(),
            SearchField::TimesheetId => vec![self.timesheet_id.to_string()],
        }
    }
}

/// Case-insensitive substring predicate over configured fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFilter {
    needle: String,
    pub fields: Vec<SearchField>,
}

impl TextFilter {
    /// `None` for blank text, which matches everything
    pub fn new(text: &str, fields: Vec<SearchField>) -> Option<Self> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            None
        } else {
            Some(Self { needle, fields })
        }
    }

    pub fn matches<T: Searchable>(&self, item: &T) -> bool {
        self.fields.iter().any(|field| {
            item.field_values(*field)
                .iter()
                .any(|value| value.to_lowercase().contains(&self.needle))
        })
    }
}

/// Date predicate on an item's anchor date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateFilter {
    #[default]
    Any,
    On { date: NaiveDate },
    /// Inclusive on both ends; checked when the query runs
    Between { start: NaiveDate, end: NaiveDate },
}

impl DateFilter {
    /// Fail with `InvalidDateRange` for a reversed range
    pub fn check(&self) -> TsResult<()> {
        if let DateFilter::Between { start, end } = self {
            DateRange::new(*start, *end)?;
        }
        Ok(())
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            DateFilter::Any => true,
            DateFilter::On { date: on } => *on == date,
            DateFilter::Between { start, end } => *start <= date && date <= *end,
        }
    }
}

/// Status predicate; `All` matches everything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter<S> {
    #[default]
    All,
    Only(S),
}

impl<S: Copy + PartialEq> StatusFilter<S> {
    pub fn matches(&self, status: S) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}
