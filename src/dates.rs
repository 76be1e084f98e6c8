use chrono::{Duration, NaiveDate};

use crate::errors::{ExpenseError, Result};

/// Parses a `YYYY-MM-DD` string as a local calendar date.
///
/// The string is never routed through a UTC offset, so a date-only value can
/// not drift into the adjacent day.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| ExpenseError::InvalidDate(input.to_string()))
}

/// Whole days from `from` to `to` on the calendar (midnight to midnight).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Shifts a date by whole calendar months, clamping the day to the length of
/// the target month (Jan 31 + 1 month = Feb 28/29).
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    use chrono::Datelike;

    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    let day = date.day().min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap_or(date)
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    use chrono::Datelike;

    let (next_year, next_month) = if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match NaiveDate::from_ymd_opt(next_year, next_month, 1) {
        Some(first_next) => (first_next - Duration::days(1)).day(),
        None => 31,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_date_accepts_plain_iso_dates() {
        assert_eq!(parse_date("2024-03-15").unwrap(), date(2024, 3, 15));
        assert_eq!(parse_date(" 2024-01-02 ").unwrap(), date(2024, 1, 2));
    }

    #[test]
    fn parse_date_rejects_malformed_input() {
        for bad in ["", "15/03/2024", "2024-13-01", "2024-02-30", "not a date"] {
            assert!(matches!(
                parse_date(bad),
                Err(crate::errors::ExpenseError::InvalidDate(_))
            ));
        }
    }

    #[test]
    fn shift_month_clamps_day_to_target_month() {
        assert_eq!(shift_month(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(shift_month(date(2023, 1, 31), 1), date(2023, 2, 28));
        assert_eq!(shift_month(date(2024, 11, 30), 3), date(2025, 2, 28));
        assert_eq!(shift_month(date(2024, 3, 15), -3), date(2023, 12, 15));
    }

    #[test]
    fn days_in_month_is_total() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
        // Out-of-range months must not panic.
        assert_eq!(days_in_month(2024, 13), 31);
        assert_eq!(days_in_month(2024, 0), 31);
    }

    #[test]
    fn days_between_is_signed() {
        assert_eq!(days_between(date(2024, 3, 10), date(2024, 3, 11)), 1);
        assert_eq!(days_between(date(2024, 3, 10), date(2024, 3, 9)), -1);
        assert_eq!(days_between(date(2024, 3, 10), date(2024, 3, 10)), 0);
    }
}
