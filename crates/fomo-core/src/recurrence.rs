use chrono::{DateTime, Days, Months, Utc};
use chrono_tz::Tz;

use crate::error::CoreError;
use crate::models::{RepeatFrequency, Task};
use crate::timezone::{parse_timezone, resolve_local};

/// Computes when the next occurrence of a recurring task falls due.
///
/// Offsets are applied to the wall-clock time in the engine's timezone, so a
/// task due every day at 09:00 keeps 09:00 across DST changes, and monthly
/// steps clamp to the last day of shorter months (Jan 31 + 1 month is Feb 28
/// or 29). The series end date is compared against the local calendar date.
#[derive(Debug, Clone, Copy)]
pub struct RecurrenceEngine {
    timezone: Tz,
}

impl Default for RecurrenceEngine {
    fn default() -> Self {
        Self { timezone: Tz::UTC }
    }
}

impl RecurrenceEngine {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Build an engine from an IANA timezone name
    pub fn from_timezone_name(name: &str) -> Result<Self, CoreError> {
        Ok(Self::new(parse_timezone(name)?))
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Returns the next due instant, or `None` when the task does not repeat
    /// or its series has ended. Pure: `now` is only used as the base when the
    /// task has no due date.
    pub fn next_due_date(&self, task: &Task, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let base = task.due_at.unwrap_or(now);
        let local = base.with_timezone(&self.timezone).naive_local();
        let interval = task.repeat_interval.max(1);

        let candidate_local = match task.repeat_frequency {
            RepeatFrequency::None => return None,
            RepeatFrequency::Daily => local.checked_add_days(Days::new(u64::from(interval)))?,
            RepeatFrequency::Weekly => {
                local.checked_add_days(Days::new(7 * u64::from(interval)))?
            }
            RepeatFrequency::Monthly => local.checked_add_months(Months::new(interval))?,
        };
        let candidate = resolve_local(&self.timezone, candidate_local)?;

        if let Some(until) = task.repeat_until {
            if candidate.with_timezone(&self.timezone).date_naive() > until {
                return None;
            }
        }
        Some(candidate)
    }
}

/// Next due instant evaluated in UTC.
pub fn calculate_next_due_date(task: &Task, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    RecurrenceEngine::default().next_due_date(task, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, NaiveDate, TimeZone, Timelike};
    use proptest::prelude::*;
    use rstest::rstest;

    fn recurring(frequency: RepeatFrequency, interval: u32, due: Option<DateTime<Utc>>) -> Task {
        Task {
            title: "Water plants".to_string(),
            repeat_frequency: frequency,
            repeat_interval: interval,
            due_at: due,
            ..Default::default()
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_non_recurring_has_no_next() {
        let task = recurring(RepeatFrequency::None, 1, Some(at(2025, 1, 1, 9)));
        assert_eq!(calculate_next_due_date(&task, Utc::now()), None);
    }

    #[rstest]
    #[case(RepeatFrequency::Daily, 2, at(2025, 1, 3, 9))]
    #[case(RepeatFrequency::Weekly, 1, at(2025, 1, 8, 9))]
    #[case(RepeatFrequency::Weekly, 3, at(2025, 1, 22, 9))]
    #[case(RepeatFrequency::Monthly, 1, at(2025, 2, 1, 9))]
    #[case(RepeatFrequency::Monthly, 12, at(2026, 1, 1, 9))]
    fn test_offsets_scale_with_interval(
        #[case] frequency: RepeatFrequency,
        #[case] interval: u32,
        #[case] expected: DateTime<Utc>,
    ) {
        let task = recurring(frequency, interval, Some(at(2025, 1, 1, 9)));
        assert_eq!(calculate_next_due_date(&task, Utc::now()), Some(expected));
    }

    #[test]
    fn test_daily_interval_two_from_now_base() {
        let due = Utc::now();
        let task = recurring(RepeatFrequency::Daily, 2, Some(due));
        let next = calculate_next_due_date(&task, Utc::now()).unwrap();
        assert!((next - (due + Duration::days(2))).num_seconds().abs() <= 1);
    }

    #[rstest]
    #[case(2025, 28)]
    #[case(2024, 29)]
    fn test_monthly_clamps_to_end_of_february(#[case] year: i32, #[case] last_day: u32) {
        let task = recurring(RepeatFrequency::Monthly, 1, Some(at(year, 1, 31, 18)));
        let next = calculate_next_due_date(&task, Utc::now()).unwrap();
        assert_eq!(next, at(year, 2, last_day, 18));
    }

    #[test]
    fn test_missing_due_date_uses_now() {
        let now = at(2025, 6, 10, 12);
        let task = recurring(RepeatFrequency::Weekly, 1, None);
        assert_eq!(calculate_next_due_date(&task, now), Some(at(2025, 6, 17, 12)));
    }

    #[test]
    fn test_end_date_terminates_series() {
        let mut task = recurring(RepeatFrequency::Daily, 1, Some(at(2025, 5, 31, 9)));
        task.repeat_until = NaiveDate::from_ymd_opt(2025, 5, 31);
        assert_eq!(calculate_next_due_date(&task, Utc::now()), None);

        // The end date itself is still allowed.
        task.repeat_until = NaiveDate::from_ymd_opt(2025, 6, 1);
        assert_eq!(calculate_next_due_date(&task, Utc::now()), Some(at(2025, 6, 1, 9)));
    }

    #[test]
    fn test_local_wall_clock_survives_dst() {
        let engine = RecurrenceEngine::from_timezone_name("Europe/Warsaw").unwrap();
        // 09:00 CET on 2025-03-29 is 08:00 UTC; the next day is CEST so 09:00 is 07:00 UTC.
        let task = recurring(RepeatFrequency::Daily, 1, Some(at(2025, 3, 29, 8)));
        let next = engine.next_due_date(&task, Utc::now()).unwrap();
        assert_eq!(next, at(2025, 3, 30, 7));
        assert_eq!(next.with_timezone(&engine.timezone()).hour(), 9);
    }

    #[test]
    fn test_end_date_uses_local_calendar_date() {
        let engine = RecurrenceEngine::from_timezone_name("Asia/Tokyo").unwrap();
        // 2025-05-31 20:00 UTC is already June 1st in Tokyo.
        let mut task = recurring(RepeatFrequency::Daily, 1, Some(at(2025, 5, 30, 20)));
        task.repeat_until = NaiveDate::from_ymd_opt(2025, 5, 31);
        assert_eq!(engine.next_due_date(&task, Utc::now()), None);
        assert!(calculate_next_due_date(&task, Utc::now()).is_some());
    }

    proptest! {
        #[test]
        fn prop_monthly_never_overshoots_target_month(
            year in 2000i32..2100,
            month in 1u32..=12,
            day in 1u32..=31,
            interval in 1u32..=24,
        ) {
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                return Ok(());
            };
            let due = Utc.from_utc_datetime(&date.and_hms_opt(10, 0, 0).unwrap());
            let task = recurring(RepeatFrequency::Monthly, interval, Some(due));
            let next = calculate_next_due_date(&task, Utc::now()).unwrap();

            let months = (year * 12 + month as i32 - 1) + interval as i32;
            prop_assert_eq!(next.year(), months / 12);
            prop_assert_eq!(next.month(), (months % 12) as u32 + 1);
            prop_assert!(next.day() <= day);
            prop_assert_eq!(next.hour(), 10);
        }

        #[test]
        fn prop_next_is_always_after_base(interval in 1u32..=60, freq in 1u8..=3) {
            let frequency = match freq {
                1 => RepeatFrequency::Daily,
                2 => RepeatFrequency::Weekly,
                _ => RepeatFrequency::Monthly,
            };
            let due = at(2025, 1, 31, 9);
            let task = recurring(frequency, interval, Some(due));
            let next = calculate_next_due_date(&task, Utc::now()).unwrap();
            prop_assert!(next > due);
        }
    }
}
