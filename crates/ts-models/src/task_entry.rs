//! TaskEntry model
//!
//! A single logged unit of work. Entries belong to exactly one timesheet and
//! are only created, changed, or removed through timesheet-scoped operations.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use ts_core::{Entity, Hours, Id, Identifiable, TsResult};
use validator::Validate;

use crate::duration::entry_duration;

/// Logged work unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskEntry {
    /// Unique within the owning timesheet; `None` until stored
    pub id: Option<Id>,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,

    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Identifiable for TaskEntry {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Entity for TaskEntry {
    const TYPE_NAME: &'static str = "TaskEntry";
}

impl TaskEntry {
    /// Build an unsaved entry, rejecting empty or reversed intervals
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> TsResult<Self> {
        entry_duration(start, end)?;
        Ok(Self {
            id: None,
            name: name.into(),
            description: description.into(),
            start,
            end,
        })
    }

    pub fn with_id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }

    pub fn duration(&self) -> TsResult<Hours> {
        entry_duration(self.start, self.end)
    }

    /// Calendar date the work started on
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }
}
