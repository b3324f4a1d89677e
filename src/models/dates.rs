use crate::error::{Result, SmartRiceError};
use chrono::{Datelike, NaiveDate};

/// Date portion of a stored date string.
///
/// Storage hands back either `YYYY-MM-DD` or a full timestamp such as
/// `2025-06-01T00:00:00+00:00`. Only the leading calendar date is kept; the
/// string is never converted through a timezone, so a value recorded near
/// midnight UTC cannot drift onto the neighbouring day.
pub fn date_portion(value: &str) -> &str {
    let trimmed = value.trim();
    trimmed
        .split(['T', ' '])
        .next()
        .unwrap_or(trimmed)
}

/// Parse a calendar date, naming the offending field on failure.
pub fn parse_calendar_date(field: &'static str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_portion(value), "%Y-%m-%d").map_err(|_| {
        SmartRiceError::InvalidDate {
            field,
            value: value.to_string(),
        }
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English name of `month` (1-12); empty for an invalid month.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("")
}

/// Number of days in `month` (1-12) of `year`; 0 for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.map(|n| (n - first).num_days() as u32)
        .unwrap_or_else(|| 31 - first.day0())
}
