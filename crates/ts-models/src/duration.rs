//! Duration arithmetic over task entries
//!
//! Durations are derived on demand from start/end instants and are never
//! stored on a model.

use chrono::NaiveDateTime;
use ts_core::{Hours, TsError, TsResult};

use crate::task_entry::TaskEntry;

/// Length of the interval `[start, end)` in hours
///
/// Fails with `InvalidInterval` when `end` is not strictly after `start`.
pub fn entry_duration(start: NaiveDateTime, end: NaiveDateTime) -> TsResult<Hours> {
    if end <= start {
        return Err(TsError::InvalidInterval {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(Hours::from_millis((end - start).num_milliseconds()))
}

/// Sum of entry durations, unrounded
///
/// A single reversed or empty interval fails the whole sum.
pub fn total_duration<'a, I>(entries: I) -> TsResult<Hours>
where
    I: IntoIterator<Item = &'a TaskEntry>,
{
    entries
        .into_iter()
        .map(|entry| entry_duration(entry.start, entry.end))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 27)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn entry(start: NaiveDateTime, end: NaiveDateTime) -> TaskEntry {
        TaskEntry::new("Task", "", start, end).unwrap()
    }

    #[test]
    fn test_entry_duration() {
        assert_eq!(entry_duration(at(9, 0), at(10, 30)).unwrap(), Hours::from_minutes(90));
    }

    #[test]
    fn test_entry_duration_rejects_empty_and_reversed() {
        let err = entry_duration(at(9, 0), at(9, 0)).unwrap_err();
        assert_eq!(err.error_code(), "invalid_interval");

        let err = entry_duration(at(9, 0), at(8, 0)).unwrap_err();
        assert_eq!(err.error_code(), "invalid_interval");
    }

    #[test]
    fn test_total_duration_two_entries() {
        let entries = vec![entry(at(9, 0), at(10, 0)), entry(at(10, 0), at(11, 30))];
        let total = total_duration(&entries).unwrap();
        assert_eq!(total.to_string(), "2.50");
    }

    #[test]
    fn test_total_duration_is_order_invariant() {
        let mut entries = vec![
            entry(at(8, 0), at(8, 20)),
            entry(at(9, 7), at(11, 13)),
            entry(at(13, 0), at(13, 1)),
            entry(at(14, 0), at(17, 45)),
        ];
        let forward = total_duration(&entries).unwrap();
        entries.reverse();
        assert_eq!(total_duration(&entries).unwrap(), forward);
        entries.swap(0, 2);
        assert_eq!(total_duration(&entries).unwrap(), forward);
    }

    #[test]
    fn test_total_duration_is_idempotent() {
        let entries = vec![entry(at(8, 0), at(8, 20)), entry(at(9, 0), at(9, 20))];
        let first = total_duration(&entries).unwrap();
        let second = total_duration(&entries).unwrap();
        assert_eq!(first.millis(), second.millis());
    }

    #[test]
    fn test_total_duration_empty() {
        let entries: Vec<TaskEntry> = Vec::new();
        assert!(total_duration(&entries).unwrap().is_zero());
    }

    #[test]
    fn test_total_duration_surfaces_reversed_entry() {
        let mut late = entry(at(10, 0), at(11, 0));
        late.end = at(9, 0);
        let entries = vec![entry(at(8, 0), at(9, 0)), late];

        let err = total_duration(&entries).unwrap_err();
        assert_eq!(err.error_code(), "invalid_interval");
    }
}
