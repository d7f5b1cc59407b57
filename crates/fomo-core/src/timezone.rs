use crate::error::CoreError;
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

/// Parse an IANA timezone name
pub fn parse_timezone(timezone: &str) -> Result<Tz, CoreError> {
    Tz::from_str(timezone).map_err(|_| CoreError::InvalidTimezone(timezone.to_string()))
}

/// Map a wall-clock time in `tz` back to a UTC instant.
///
/// Ambiguous times (clocks falling back) resolve to the earliest instant.
/// Times inside a spring-forward gap are pushed one hour later.
pub fn resolve_local(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local).earliest() {
        Some(dt) => Some(dt.with_timezone(&Utc)),
        None => tz
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

/// Format datetime with timezone-aware display
pub fn format_with_timezone(datetime: DateTime<Utc>, tz: &Tz, format: &str) -> String {
    datetime.with_timezone(tz).format(format).to_string()
}
