//! Sort orders
//!
//! Results are always ordered by numeric identifier. The direction toggles.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use ts_core::Id;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (1-9)
    #[default]
    Asc,
    /// Descending order (9-1)
    Desc,
}

impl SortDirection {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Get the opposite direction
    pub fn reverse(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Compare two identifiers in this direction
    pub fn compare(&self, a: Id, b: Id) -> Ordering {
        match self {
            Self::Asc => a.cmp(&b),
            Self::Desc => b.cmp(&a),
        }
    }
}

/// Stable in-place sort of `items` by the identifier `key` returns
pub fn sort_by_id<T, F>(items: &mut [T], direction: SortDirection, key: F)
where
    F: Fn(&T) -> Id,
{
    items.sort_by(|a, b| direction.compare(key(a), key(b)));
}
