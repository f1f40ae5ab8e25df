//! Query Builder
//!
//! Fluent construction of [`SearchQuery`] values, plus the presets the
//! employee and approver views start from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_core::{PageRequest, DEFAULT_PAGE_SIZE};
use ts_models::Decision;

use crate::filters::{DateFilter, SearchField, StatusFilter, TextFilter};
use crate::query::SearchQuery;
use crate::sorts::SortDirection;

/// Builder for constructing queries fluently
#[derive(Debug, Clone)]
pub struct SearchQueryBuilder<S> {
    text: String,
    fields: Vec<SearchField>,
    date: DateFilter,
    status: StatusFilter<S>,
    direction: SortDirection,
    page: usize,
    per_page: usize,
}

impl<S> Default for SearchQueryBuilder<S> {
    fn default() -> Self {
        Self {
            text: String::new(),
            fields: SearchField::ALL.to_vec(),
            date: DateFilter::Any,
            status: StatusFilter::All,
            direction: SortDirection::Asc,
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl<S: Copy + PartialEq> SearchQueryBuilder<S> {
    /// Create a new query builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Free-text search term
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Fields the search term is matched against
    pub fn fields(mut self, fields: impl Into<Vec<SearchField>>) -> Self {
        self.fields = fields.into();
        self
    }

    // Date methods. Picking one kind of date filter clears the other.

    /// Match a single calendar date
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = DateFilter::On { date };
        self
    }

    /// Match an inclusive date range
    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date = DateFilter::Between { start, end };
        self
    }

    // Status methods

    pub fn status(mut self, status: S) -> Self {
        self.status = StatusFilter::Only(status);
        self
    }

    // Sort methods

    pub fn descending(mut self) -> Self {
        self.direction = SortDirection::Desc;
        self
    }

    pub fn toggle_sort(mut self) -> Self {
        self.direction = self.direction.reverse();
        self
    }

    // Pagination

    /// 1-indexed page number
    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page;
        self
    }

    /// Build the query
    pub fn build(self) -> SearchQuery<S> {
        SearchQuery {
            text: TextFilter::new(&self.text, self.fields),
            date: self.date,
            status: self.status,
            direction: self.direction,
            page: PageRequest::new(self.page, self.per_page),
        }
    }
}

/// Tabs of the approver view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApproverTab {
    #[default]
    All,
    Pending,
    Approved,
    Rejected,
}

impl ApproverTab {
    pub const ALL_TABS: [ApproverTab; 4] = [
        ApproverTab::All,
        ApproverTab::Pending,
        ApproverTab::Approved,
        ApproverTab::Rejected,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ApproverTab::All => "All",
            ApproverTab::Pending => "Pending",
            ApproverTab::Approved => "Approved",
            ApproverTab::Rejected => "Rejected",
        }
    }

    /// The decision predicate this tab applies
    pub fn status_filter(&self) -> StatusFilter<Decision> {
        match self {
            ApproverTab::All => StatusFilter::All,
            ApproverTab::Pending => StatusFilter::Only(Decision::Pending),
            ApproverTab::Approved => StatusFilter::Only(Decision::Approved),
            ApproverTab::Rejected => StatusFilter::Only(Decision::Rejected),
        }
    }
}

impl std::str::FromStr for ApproverTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApproverTab::ALL_TABS
            .into_iter()
            .find(|tab| tab.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown tab: {}", s))
    }
}

/// Pre-built queries
pub mod presets {
    use super::*;
    use ts_models::TimesheetStatus;

    /// The employee's own list: search task name and description, any status
    pub fn employee_view(per_page: usize) -> SearchQueryBuilder<TimesheetStatus> {
        SearchQueryBuilder::new()
            .fields(vec![
                SearchField::TaskName,
                SearchField::TaskDescription,
                SearchField::TimesheetId,
            ])
            .per_page(per_page)
    }

    /// One approver tab: search by employee email
    pub fn approver_tab(tab: ApproverTab, per_page: usize) -> SearchQueryBuilder<Decision> {
        let mut builder = SearchQueryBuilder::new()
            .fields(vec![SearchField::EmployeeEmail])
            .per_page(per_page);
        builder.status = tab.status_filter();
        builder
    }
}
