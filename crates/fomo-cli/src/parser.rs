use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_english::{parse_date_string, Dialect};
use chrono_tz::Tz;

/// Parse a due date such as "tomorrow 9am" or "2025-12-24 18:00".
/// Relative and wall-clock input is read in `timezone`.
pub fn parse_due_date(date_str: &str, timezone: &Tz) -> Result<DateTime<Utc>> {
    let now = Utc::now().with_timezone(timezone);
    parse_date_string(date_str.trim(), now, Dialect::Uk)
        .map(|local| local.with_timezone(&Utc))
        .map_err(|e| anyhow!("Failed to parse due date '{}': {}", date_str, e))
}

/// Parse a recurrence end date in `YYYY-MM-DD` form.
pub fn parse_until_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid end date '{}'. Use YYYY-MM-DD", date_str))
}
