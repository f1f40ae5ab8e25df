//! Task entry contract
//!
//! Entries may only be added, changed, or removed by someone allowed to edit
//! the timesheet, and only while it has not been sent.

use ts_core::{Id, TsError, TsResult, ValidationErrors};
use ts_models::{Entity, TaskEntry, Timesheet};
use validator::Validate;

use crate::base::{Capabilities, Capability, Contract, ValidationResult};

/// What is being done to the entry set
#[derive(Debug, Clone, Copy)]
pub enum EntryChange<'e> {
    Add(&'e TaskEntry),
    Update(&'e TaskEntry),
    Remove(Id),
}

pub struct TaskEntryContract<'a, C: Capabilities + ?Sized> {
    actor: &'a C,
}

impl<'a, C: Capabilities + ?Sized> TaskEntryContract<'a, C> {
    pub fn new(actor: &'a C) -> Self {
        Self { actor }
    }

    /// Only unsent timesheets accept entry changes
    pub fn validate_unlocked(&self, timesheet: &Timesheet) -> TsResult<()> {
        if timesheet.status.is_editable() {
            Ok(())
        } else {
            Err(TsError::TimesheetLocked {
                timesheet_id: timesheet.id,
                status: timesheet.status.label(),
            })
        }
    }

    /// Field checks on the entry itself
    pub fn validate_fields(&self, entry: &TaskEntry) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if entry.name.trim().is_empty() {
            errors.add("name", "can't be blank");
        }
        if let Err(field_errors) = entry.validate() {
            let converted = ValidationErrors::from(field_errors);
            for (field, messages) in converted.errors {
                if field == "name" && errors.has_error("name") {
                    continue;
                }
                for message in messages {
                    errors.add(field.clone(), message);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_entry(&self, entry: &TaskEntry) -> TsResult<()> {
        entry.duration()?;
        self.validate_fields(entry)?;
        Ok(())
    }

    fn validate_exists(&self, timesheet: &Timesheet, entry_id: Id) -> TsResult<()> {
        if timesheet.entry(entry_id).is_some() {
            Ok(())
        } else {
            Err(TsError::not_found(TaskEntry::TYPE_NAME, entry_id))
        }
    }
}

impl<'a, 'e, C: Capabilities + ?Sized> Contract<(&'e Timesheet, EntryChange<'e>)>
    for TaskEntryContract<'a, C>
{
    fn validate(&self, target: &(&'e Timesheet, EntryChange<'e>)) -> TsResult<()> {
        let (timesheet, change) = *target;

        self.actor.ensure(Capability::EditEntries, timesheet)?;
        self.validate_unlocked(timesheet)?;

        match change {
            EntryChange::Add(entry) => self.validate_entry(entry),
            EntryChange::Update(entry) => {
                let id = entry
                    .id
                    .ok_or_else(|| TsError::not_found(TaskEntry::TYPE_NAME, 0))?;
                self.validate_exists(timesheet, id)?;
                self.validate_entry(entry)
            }
            EntryChange::Remove(id) => self.validate_exists(timesheet, id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use ts_core::{DateScope, Email};
    use ts_models::TimesheetStatus;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 27)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn sheet() -> Timesheet {
        let mut ts = Timesheet::new(
            1,
            42,
            Email::parse("dev@example.com").unwrap(),
            DateScope::day(NaiveDate::from_ymd_opt(2025, 1, 27).unwrap()),
        );
        ts.entries
            .push(TaskEntry::new("Existing", "", at(9), at(10)).unwrap().with_id(1));
        ts
    }

    fn allow_all(_: Capability, _: &Timesheet) -> bool {
        true
    }

    #[test]
    fn test_add_to_unsent_timesheet() {
        let ts = sheet();
        let entry = TaskEntry::new("New", "", at(10), at(11)).unwrap();
        let contract = TaskEntryContract::new(&allow_all);
        assert!(contract.validate(&(&ts, EntryChange::Add(&entry))).is_ok());
    }

    #[test]
    fn test_locked_once_sent() {
        let mut ts = sheet();
        ts.status = TimesheetStatus::SentForApproval;
        let entry = ts.entries[0].clone();
        let contract = TaskEntryContract::new(&allow_all);

        let err = contract
            .validate(&(&ts, EntryChange::Update(&entry)))
            .unwrap_err();
        assert_eq!(err.error_code(), "timesheet_locked");

        let err = contract.validate(&(&ts, EntryChange::Remove(1))).unwrap_err();
        assert_eq!(err.error_code(), "timesheet_locked");
    }

    #[test]
    fn test_update_missing_entry() {
        let ts = sheet();
        let entry = TaskEntry::new("Ghost", "", at(9), at(10)).unwrap().with_id(99);
        let contract = TaskEntryContract::new(&allow_all);
        let err = contract
            .validate(&(&ts, EntryChange::Update(&entry)))
            .unwrap_err();
        assert_eq!(err.error_code(), "not_found");
    }

    #[test]
    fn test_blank_name_rejected() {
        let ts = sheet();
        let entry = TaskEntry::new("   ", "", at(10), at(11)).unwrap();
        let contract = TaskEntryContract::new(&allow_all);
        let err = contract.validate(&(&ts, EntryChange::Add(&entry))).unwrap_err();
        match err {
            TsError::Validation(errors) => {
                assert_eq!(errors.get("name").map(|m| m.len()), Some(1));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reversed_interval_rejected() {
        let ts = sheet();
        let mut entry = TaskEntry::new("Late", "", at(10), at(11)).unwrap();
        entry.end = at(9);
        let contract = TaskEntryContract::new(&allow_all);
        let err = contract.validate(&(&ts, EntryChange::Add(&entry))).unwrap_err();
        assert_eq!(err.error_code(), "invalid_interval");
    }

    #[test]
    fn test_requires_edit_capability() {
        let ts = sheet();
        let deny = |_: Capability, _: &Timesheet| false;
        let contract = TaskEntryContract::new(&deny);
        let err = contract.validate(&(&ts, EntryChange::Remove(1))).unwrap_err();
        assert_eq!(err.error_code(), "forbidden");
    }
}
