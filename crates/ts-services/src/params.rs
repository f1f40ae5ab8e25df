//! Service params

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use ts_core::{TsResult, ValidationErrors};
use ts_models::TaskEntry;
use validator::Validate;

/// Task entry params for add and edit
///
/// Absent fields keep their current value on edit and are required on add.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskEntryParams {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl TaskEntryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_interval(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Build a new, unsaved entry
    pub fn into_entry(self) -> TsResult<TaskEntry> {
        self.validate().map_err(ValidationErrors::from)?;

        let mut errors = ValidationErrors::new();
        if self.name.is_none() {
            errors.add("name", "can't be blank");
        }
        if self.start.is_none() {
            errors.add("start", "can't be blank");
        }
        if self.end.is_none() {
            errors.add("end", "can't be blank");
        }

        match (self.name, self.start, self.end) {
            (Some(name), Some(start), Some(end)) => {
                TaskEntry::new(name, self.description.unwrap_or_default(), start, end)
            }
            _ => Err(errors.into()),
        }
    }

    /// Copy the present fields onto an existing entry
    pub fn apply_to(&self, entry: &mut TaskEntry) -> TsResult<()> {
        self.validate().map_err(ValidationErrors::from)?;

        if let Some(name) = &self.name {
            entry.name = name.clone();
        }
        if let Some(description) = &self.description {
            entry.description = description.clone();
        }
        if let Some(start) = self.start {
            entry.start = start;
        }
        if let Some(end) = self.end {
            entry.end = end;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 27)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_into_entry() {
        let entry = TaskEntryParams::new()
            .with_name("Planning")
            .with_interval(at(9), at(11))
            .into_entry()
            .unwrap();
        assert_eq!(entry.name, "Planning");
        assert_eq!(entry.description, "");
        assert!(entry.id.is_none());
    }

    #[test]
    fn test_into_entry_requires_fields() {
        let err = TaskEntryParams::new().with_name("Planning").into_entry().unwrap_err();
        match err {
            ts_core::TsError::Validation(errors) => {
                assert!(errors.has_error("start"));
                assert!(errors.has_error("end"));
                assert!(!errors.has_error("name"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_into_entry_rejects_reversed_interval() {
        let err = TaskEntryParams::new()
            .with_name("Planning")
            .with_interval(at(11), at(9))
            .into_entry()
            .unwrap_err();
        assert_eq!(err.error_code(), "invalid_interval");
    }

    #[test]
    fn test_apply_to_keeps_absent_fields() {
        let mut entry = TaskEntry::new("Old", "desc", at(9), at(10)).unwrap();
        TaskEntryParams::new().with_name("New").apply_to(&mut entry).unwrap();
        assert_eq!(entry.name, "New");
        assert_eq!(entry.description, "desc");
        assert_eq!(entry.end, at(10));
    }

    #[test]
    fn test_empty_name_fails_validation() {
        let err = TaskEntryParams::new()
            .with_name("")
            .with_interval(at(9), at(10))
            .into_entry()
            .unwrap_err();
        assert_eq!(err.error_code(), "validation_failed");
    }
}
