//! # ts-queries
//!
//! Filter/search engine for Timesheet Approvals RS.
//!
//! Given a collection of timesheets (employee side) or approval views
//! (approver side) and a set of predicates, returns the matching items in
//! identifier order, one page at a time.
//!
//! ## Structure
//!
//! - `filters` - Text, date and status predicates, and the `Searchable` trait
//! - `sorts` - Sort directions
//! - `query` - The `SearchQuery` model and the `filter` / `matching` entry points
//! - `builder` - Fluent API for constructing queries, plus presets
//!
//! ## Example
//!
//! ```
//! use ts_queries::builder::{presets, ApproverTab};
//!
//! let query = presets::approver_tab(ApproverTab::Pending, 5)
//!     .text("acme.com")
//!     .descending()
//!     .build();
//!
//! assert!(query.text.is_some());
//! ```

pub mod filters;
pub mod sorts;
pub mod query;
pub mod builder;

// Re-exports for convenience
pub use filters::{DateFilter, SearchField, Searchable, StatusFilter, TextFilter};
pub use sorts::SortDirection;
pub use query::{filter, matching, SearchQuery};
pub use builder::{presets, ApproverTab, SearchQueryBuilder};
