// ABOUTME: Subtask duration and delay calculation from estimated and actual dates
// ABOUTME: Clock abstraction keeps the calculation deterministic under test

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::cmp::Ordering;

use crate::error::ScheduleError;
use crate::types::{DelayStatus, Subtask, SubtaskStatus};

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Source of the current time
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Whole hours between two instants, rounded up; 0 unless both are present
pub fn duration_hours(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> u64 {
    match (start, end) {
        (Some(start), Some(end)) => {
            let millis = (end - start).num_milliseconds().unsigned_abs();
            millis.div_ceil(MILLIS_PER_HOUR as u64)
        }
        _ => 0,
    }
}

fn compare(actual: DateTime<Utc>, estimated: DateTime<Utc>) -> DelayStatus {
    match actual.cmp(&estimated) {
        Ordering::Greater => DelayStatus::Late,
        Ordering::Less => DelayStatus::Early,
        Ordering::Equal => DelayStatus::OnTime,
    }
}

/// Delay state of a subtask at `now`.
///
/// A completed subtask is judged by its recorded finish date only; without one
/// the record is inconsistent and rejected.
pub fn delay_status(subtask: &Subtask, now: DateTime<Utc>) -> Result<DelayStatus, ScheduleError> {
    let Some(estimated_end) = subtask.estimated_end else {
        return Ok(DelayStatus::Unknown);
    };

    if let Some(actual_end) = subtask.actual_end {
        return Ok(compare(actual_end, estimated_end));
    }

    match subtask.status {
        SubtaskStatus::Completed => Err(ScheduleError::MissingActualEnd {
            subtask_id: subtask.id.clone(),
        }),
        SubtaskStatus::InProgress if now > estimated_end => Ok(DelayStatus::Late),
        _ => Ok(DelayStatus::Unknown),
    }
}

/// Refresh the derived duration and delay fields of a subtask
pub fn recalculate_subtask_fields(
    mut subtask: Subtask,
    clock: &impl Clock,
) -> Result<Subtask, ScheduleError> {
    subtask.estimated_duration_hours =
        duration_hours(subtask.estimated_start, subtask.estimated_end);
    subtask.actual_duration_hours = duration_hours(subtask.actual_start, subtask.actual_end);
    subtask.delay_status = delay_status(&subtask, clock.now())?;
    Ok(subtask)
}

/// Parse a timestamp as typed into the dashboard date pickers.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]`, `YYYY-MM-DD HH:MM[:SS]` and bare
/// dates. Values without an offset are taken as UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, ScheduleError> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for format in FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(ScheduleError::InvalidTimestamp(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn scheduled(status: SubtaskStatus) -> Subtask {
        let mut subtask = Subtask::new("sub-1", "前端开发").with_status(status);
        subtask.estimated_start = Some(at(2024, 4, 1, 9, 0));
        subtask.estimated_end = Some(at(2024, 4, 5, 18, 0));
        subtask
    }

    #[test]
    fn test_duration_hours_example() {
        let hours = duration_hours(Some(at(2024, 4, 1, 9, 0)), Some(at(2024, 4, 5, 18, 0)));
        assert_eq!(hours, 105);
    }

    #[test]
    fn test_duration_hours_rounds_up() {
        let start = at(2024, 4, 1, 9, 0);
        assert_eq!(duration_hours(Some(start), Some(start + Duration::minutes(1))), 1);
        assert_eq!(duration_hours(Some(start), Some(start + Duration::minutes(61))), 2);
        assert_eq!(duration_hours(Some(start), Some(start)), 0);
    }

    #[test]
    fn test_duration_hours_is_absolute() {
        let hours = duration_hours(Some(at(2024, 4, 5, 18, 0)), Some(at(2024, 4, 1, 9, 0)));
        assert_eq!(hours, 105);
    }

    #[test]
    fn test_duration_hours_missing_bound() {
        assert_eq!(duration_hours(None, Some(at(2024, 4, 1, 9, 0))), 0);
        assert_eq!(duration_hours(Some(at(2024, 4, 1, 9, 0)), None), 0);
    }

    #[test]
    fn test_delay_unknown_without_estimated_end() {
        let mut subtask = Subtask::new("s", "测试").with_status(SubtaskStatus::Completed);
        subtask.actual_end = Some(at(2024, 4, 5, 18, 0));
        assert_eq!(
            delay_status(&subtask, at(2030, 1, 1, 0, 0)).unwrap(),
            DelayStatus::Unknown
        );
    }

    #[test]
    fn test_delay_compares_actual_end() {
        let now = at(2024, 6, 1, 0, 0);
        let mut subtask = scheduled(SubtaskStatus::Completed);

        subtask.actual_end = Some(at(2024, 4, 6, 10, 0));
        assert_eq!(delay_status(&subtask, now).unwrap(), DelayStatus::Late);

        subtask.actual_end = Some(at(2024, 4, 4, 10, 0));
        assert_eq!(delay_status(&subtask, now).unwrap(), DelayStatus::Early);

        subtask.actual_end = subtask.estimated_end;
        assert_eq!(delay_status(&subtask, now).unwrap(), DelayStatus::OnTime);
    }

    #[test]
    fn test_delay_in_progress_overdue_is_late() {
        let now = Utc::now();
        let mut subtask = Subtask::new("s", "前端开发").with_status(SubtaskStatus::InProgress);
        subtask.estimated_end = Some(now - Duration::days(1));
        assert_eq!(delay_status(&subtask, now).unwrap(), DelayStatus::Late);
    }

    #[test]
    fn test_delay_in_progress_not_yet_due_is_unknown() {
        let subtask = scheduled(SubtaskStatus::InProgress);
        assert_eq!(
            delay_status(&subtask, at(2024, 4, 3, 0, 0)).unwrap(),
            DelayStatus::Unknown
        );
    }

    #[test]
    fn test_delay_not_started_past_due_is_unknown() {
        let subtask = scheduled(SubtaskStatus::NotStarted);
        assert_eq!(
            delay_status(&subtask, at(2025, 1, 1, 0, 0)).unwrap(),
            DelayStatus::Unknown
        );
    }

    #[test]
    fn test_completed_without_actual_end_is_rejected() {
        let subtask = scheduled(SubtaskStatus::Completed);
        let err = delay_status(&subtask, at(2024, 4, 3, 0, 0)).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::MissingActualEnd { ref subtask_id } if subtask_id == "sub-1"
        ));
    }

    #[test]
    fn test_recalculate_uses_clock() {
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .times(1)
            .return_const(at(2024, 4, 10, 0, 0));

        let mut subtask = scheduled(SubtaskStatus::InProgress);
        subtask.actual_start = Some(at(2024, 4, 1, 10, 0));

        let updated = recalculate_subtask_fields(subtask, &clock).unwrap();
        assert_eq!(updated.estimated_duration_hours, 105);
        assert_eq!(updated.actual_duration_hours, 0);
        assert_eq!(updated.delay_status, DelayStatus::Late);
    }

    #[test]
    fn test_recalculate_actual_duration() {
        let mut subtask = scheduled(SubtaskStatus::Completed);
        subtask.actual_start = Some(at(2024, 4, 1, 9, 0));
        subtask.actual_end = Some(at(2024, 4, 1, 11, 30));

        let updated =
            recalculate_subtask_fields(subtask, &FixedClock(at(2024, 5, 1, 0, 0))).unwrap();
        assert_eq!(updated.actual_duration_hours, 3);
        assert_eq!(updated.delay_status, DelayStatus::Early);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = at(2024, 4, 1, 9, 0);
        assert_eq!(parse_timestamp("2024-04-01T09:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-04-01 09:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-04-01T09:00:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-04-01T17:00:00+08:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-04-01").unwrap(), at(2024, 4, 1, 0, 0));
        assert!(parse_timestamp("April 1st").is_err());
    }
}
