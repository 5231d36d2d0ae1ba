//! Calendar and formatting helpers built on chrono.
//!
//! Difference counts (`days_between`, `months_between`, `years_between`)
//! return whole units truncated toward zero, so a span of 29 days is zero
//! months regardless of direction.

use crate::{SvcError, SvcResult};
use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};

/// Default pattern for dates.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
/// Default pattern for times of day.
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";
/// Default pattern for date-times.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Default pattern for date-times with milliseconds.
pub const DEFAULT_DATETIME_MS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Formats a date with the default `yyyy-MM-dd` pattern.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    format_date_with(date, DEFAULT_DATE_FORMAT)
}

/// Formats a date with a custom pattern.
#[must_use]
pub fn format_date_with(date: NaiveDate, pattern: &str) -> String {
    date.format(pattern).to_string()
}

/// Formats a date-time with the default `yyyy-MM-dd HH:mm:ss` pattern.
#[must_use]
pub fn format_datetime(datetime: NaiveDateTime) -> String {
    format_datetime_with(datetime, DEFAULT_DATETIME_FORMAT)
}

/// Formats a date-time with a custom pattern.
#[must_use]
pub fn format_datetime_with(datetime: NaiveDateTime, pattern: &str) -> String {
    datetime.format(pattern).to_string()
}

/// Parses a date with the default pattern.
pub fn parse_date(input: &str) -> SvcResult<NaiveDate> {
    parse_date_with(input, DEFAULT_DATE_FORMAT)
}

/// Parses a date with a custom pattern.
pub fn parse_date_with(input: &str, pattern: &str) -> SvcResult<NaiveDate> {
    NaiveDate::parse_from_str(input, pattern)
        .map_err(|e| SvcError::business(format!("invalid date '{input}': {e}")))
}

/// Parses a date-time with the default pattern.
pub fn parse_datetime(input: &str) -> SvcResult<NaiveDateTime> {
    parse_datetime_with(input, DEFAULT_DATETIME_FORMAT)
}

/// Parses a date-time with a custom pattern.
pub fn parse_datetime_with(input: &str, pattern: &str) -> SvcResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, pattern)
        .map_err(|e| SvcError::business(format!("invalid date-time '{input}': {e}")))
}

/// Returns midnight at the start of the given day.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Returns the last representable instant of the given day
/// (23:59:59.999999999).
#[must_use]
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
        .unwrap_or(NaiveTime::MIN);
    date.and_time(last)
}

/// Returns the first day of the date's month.
#[must_use]
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Returns the last calendar day of the date's month, honoring leap years.
#[must_use]
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .unwrap_or(date)
}

/// Adds (or subtracts, when negative) calendar days. Saturates at the
/// representable date range.
#[must_use]
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
            .unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Adds (or subtracts) calendar months, clamping the day to the target
/// month's length (Jan 31 + 1 month = Feb 28/29).
#[must_use]
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
            .unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Adds (or subtracts) calendar years with leap-day clamping.
#[must_use]
pub fn add_years(date: NaiveDate, years: i32) -> NaiveDate {
    add_months(date, years.saturating_mul(12))
}

/// Whole days from `start` to `end` (negative when `end` is earlier).
#[must_use]
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days()
}

/// Whole months from `start` to `end`, truncated toward zero.
#[must_use]
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let mut months = (i64::from(end.year()) - i64::from(start.year())) * 12
        + (i64::from(end.month()) - i64::from(start.month()));
    if months > 0 && end.day() < start.day() {
        months -= 1;
    } else if months < 0 && end.day() > start.day() {
        months += 1;
    }
    months
}

/// Whole years from `start` to `end`, truncated toward zero.
#[must_use]
pub fn years_between(start: NaiveDate, end: NaiveDate) -> i64 {
    months_between(start, end) / 12
}

/// Whether the date falls on a Saturday or Sunday.
#[must_use]
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Age in whole years as of today (UTC).
#[must_use]
pub fn age(birth_date: NaiveDate) -> i64 {
    years_between(birth_date, Utc::now().date_naive())
}

/// Current timestamp in milliseconds since the epoch.
#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current timestamp in seconds since the epoch.
#[must_use]
pub fn now_seconds() -> i64 {
    Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn format_uses_default_patterns() {
        let d = date(2024, 3, 7);
        assert_eq!(format_date(d), "2024-03-07");
        let dt = d.and_hms_opt(9, 5, 1).unwrap();
        assert_eq!(format_datetime(dt), "2024-03-07 09:05:01");
    }

    #[test]
    fn parse_round_trips_format() {
        let d = date(2023, 11, 30);
        assert_eq!(parse_date(&format_date(d)).unwrap(), d);

        let pattern = "%d/%m/%Y";
        assert_eq!(
            parse_date_with(&format_date_with(d, pattern), pattern).unwrap(),
            d
        );

        let dt = d.and_hms_opt(23, 1, 2).unwrap();
        assert_eq!(parse_datetime(&format_datetime(dt)).unwrap(), dt);
    }

    #[test]
    fn parse_rejects_malformed_input() {
        let err = parse_date("not-a-date").unwrap_err();
        assert!(err.is_business());
    }

    #[test]
    fn day_boundaries() {
        let d = date(2024, 2, 29);
        assert_eq!(format_datetime(start_of_day(d)), "2024-02-29 00:00:00");
        let end = end_of_day(d);
        assert_eq!(end.format("%H:%M:%S%.9f").to_string(), "23:59:59.999999999");
    }

    #[test]
    fn month_boundaries_honor_leap_years() {
        assert_eq!(start_of_month(date(2024, 2, 15)), date(2024, 2, 1));
        assert_eq!(end_of_month(date(2024, 2, 15)), date(2024, 2, 29));
        assert_eq!(end_of_month(date(2023, 2, 15)), date(2023, 2, 28));
        assert_eq!(end_of_month(date(2023, 12, 1)), date(2023, 12, 31));
    }

    #[test]
    fn calendar_arithmetic_clamps_month_length() {
        assert_eq!(add_days(date(2024, 2, 28), 2), date(2024, 3, 1));
        assert_eq!(add_days(date(2024, 3, 1), -1), date(2024, 2, 29));
        assert_eq!(add_months(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(add_months(date(2024, 3, 31), -1), date(2024, 2, 29));
        assert_eq!(add_years(date(2024, 2, 29), 1), date(2025, 2, 28));
    }

    #[test]
    fn whole_unit_differences_truncate_toward_zero() {
        assert_eq!(days_between(date(2024, 1, 1), date(2024, 1, 31)), 30);
        assert_eq!(days_between(date(2024, 1, 31), date(2024, 1, 1)), -30);

        // 29 days is zero whole months, either direction.
        assert_eq!(months_between(date(2024, 1, 31), date(2024, 2, 29)), 0);
        assert_eq!(months_between(date(2024, 2, 29), date(2024, 1, 31)), 0);
        assert_eq!(months_between(date(2024, 1, 15), date(2024, 3, 15)), 2);
        assert_eq!(months_between(date(2024, 3, 15), date(2024, 1, 15)), -2);

        assert_eq!(years_between(date(2000, 6, 1), date(2024, 5, 31)), 23);
        assert_eq!(years_between(date(2000, 6, 1), date(2024, 6, 1)), 24);
    }

    #[test]
    fn weekend_detection() {
        assert!(is_weekend(date(2024, 3, 9))); // Saturday
        assert!(is_weekend(date(2024, 3, 10))); // Sunday
        assert!(!is_weekend(date(2024, 3, 11))); // Monday
    }

    #[test]
    fn now_functions_are_monotonic_enough() {
        let millis = now_millis();
        let seconds = now_seconds();
        assert!(millis / 1000 - seconds < 2);
    }
}
