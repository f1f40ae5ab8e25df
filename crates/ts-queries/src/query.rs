//! Search queries
//!
//! A [`SearchQuery`] bundles the predicates, the sort direction and the page
//! to return. Running a query is pure: no I/O and no state between calls.

use serde::{Deserialize, Serialize};
use ts_core::{Page, PageRequest, TsResult};

use crate::filters::{DateFilter, SearchField, Searchable, StatusFilter, TextFilter};
use crate::sorts::{sort_by_id, SortDirection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery<S> {
    pub text: Option<TextFilter>,
    pub date: DateFilter,
    pub status: StatusFilter<S>,
    pub direction: SortDirection,
    pub page: PageRequest,
}

impl<S> Default for SearchQuery<S> {
    fn default() -> Self {
        Self {
            text: None,
            date: DateFilter::Any,
            status: StatusFilter::All,
            direction: SortDirection::Asc,
            page: PageRequest::default(),
        }
    }
}

impl<S: Copy + PartialEq> SearchQuery<S> {
    /// Whether `item` passes every predicate
    pub fn matches<T>(&self, item: &T) -> bool
    where
        T: Searchable<Status = S>,
    {
        self.text.as_ref().map_or(true, |text| text.matches(item))
            && self.date.matches(item.search_date())
            && self.status.matches(item.search_status())
    }

    /// Matching items in query order, without pagination
    pub fn matching<T>(&self, items: &[T]) -> TsResult<Vec<T>>
    where
        T: Searchable<Status = S> + Clone,
    {
        self.date.check()?;

        let mut matched: Vec<T> = items
            .iter()
            .filter(|item| self.matches(*item))
            .cloned()
            .collect();
        sort_by_id(&mut matched, self.direction, |item| item.search_id());
        Ok(matched)
    }

    /// The requested page of matching items plus the total match count
    pub fn filter<T>(&self, items: &[T]) -> TsResult<Page<T>>
    where
        T: Searchable<Status = S> + Clone,
    {
        let matched = self.matching(items)?;
        Ok(Page::slice(matched, self.page))
    }

    pub fn searches(&self, field: SearchField) -> bool {
        self.text
            .as_ref()
            .map(|text| text.fields.contains(&field))
            .unwrap_or(false)
    }
}

/// Run `query` over `items`, returning one page and the total count
pub fn filter<T>(items: &[T], query: &SearchQuery<T::Status>) -> TsResult<Page<T>>
where
    T: Searchable + Clone,
{
    query.filter(items)
}

/// Run `query` over `items` without pagination
pub fn matching<T>(items: &[T], query: &SearchQuery<T::Status>) -> TsResult<Vec<T>>
where
    T: Searchable + Clone,
{
    query.matching(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ts_core::{DateScope, Email, Id};
    use ts_models::{Timesheet, TimesheetStatus};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn sheet(id: Id, day: u32, status: TimesheetStatus) -> Timesheet {
        let mut ts = Timesheet::new(
            id,
            1,
            Email::parse(&format!("dev{}@example.com", id % 3)).unwrap(),
            DateScope::day(date(day)),
        );
        ts.status = status;
        ts
    }

    fn approved_dozen_plus_noise() -> Vec<Timesheet> {
        let mut items = Vec::new();
        // interleave non-matching statuses between the twelve approved ones
        for id in 1..=24 {
            let status = if id % 2 == 0 {
                TimesheetStatus::Approved
            } else {
                TimesheetStatus::Rejected
            };
            items.push(sheet(id, (id % 28 + 1) as u32, status));
        }
        items.reverse();
        items
    }

    fn approved(page: usize, per_page: usize) -> SearchQuery<TimesheetStatus> {
        SearchQuery {
            status: StatusFilter::Only(TimesheetStatus::Approved),
            page: PageRequest::new(page, per_page),
            ..Default::default()
        }
    }

    #[test]
    fn test_second_page_of_twelve() {
        let items = approved_dozen_plus_noise();
        let page = filter(&items, &approved(2, 5)).unwrap();

        assert_eq!(page.total, 12);
        let ids: Vec<Id> = page.items.iter().map(|ts| ts.id).collect();
        // 6th to 10th approved timesheet in ascending id order
        assert_eq!(ids, vec![12, 14, 16, 18, 20]);
    }

    #[test]
    fn test_page_beyond_end_is_empty() {
        let items = approved_dozen_plus_noise();
        let page = filter(&items, &approved(4, 5)).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 12);
    }

    #[test]
    fn test_descending_order() {
        let items = approved_dozen_plus_noise();
        let mut query = approved(1, 3);
        query.direction = SortDirection::Desc;
        let ids: Vec<Id> = filter(&items, &query).unwrap().items.iter().map(|ts| ts.id).collect();
        assert_eq!(ids, vec![24, 22, 20]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let items = approved_dozen_plus_noise();
        let query = SearchQuery {
            text: TextFilter::new("dev1", vec![crate::filters::SearchField::EmployeeEmail]),
            date: DateFilter::Between { start: date(2), end: date(20) },
            status: StatusFilter::Only(TimesheetStatus::Approved),
            ..Default::default()
        };

        let once = matching(&items, &query).unwrap();
        let twice = matching(&once, &query).unwrap();
        assert_eq!(once, twice);
        assert!(!once.is_empty());
    }

    #[test]
    fn test_reversed_range_fails() {
        let items = approved_dozen_plus_noise();
        let query: SearchQuery<TimesheetStatus> = SearchQuery {
            date: DateFilter::Between { start: date(20), end: date(2) },
            ..Default::default()
        };
        assert_eq!(
            filter(&items, &query).unwrap_err().error_code(),
            "invalid_date_range"
        );
    }

    #[test]
    fn test_single_date() {
        let items = approved_dozen_plus_noise();
        let query: SearchQuery<TimesheetStatus> = SearchQuery {
            date: DateFilter::On { date: date(5) },
            ..Default::default()
        };
        let page = filter(&items, &query).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, 4);
    }
}
