//! Free-form date parsing.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use crate::error::OvertimeError;

/// Pre-compiled pattern for the accepted date layouts.
///
/// A year, optionally followed by month and day, optionally followed by a
/// time of day and a zone (`Z`, `+0200`, `+02:00 CEST`).
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^(\d{4})
        (?:-(\d{1,2})(?:-(\d{1,2}))?)?
        (?:[\sT]+
            (\d{1,2})(?::(\d{1,2})(?::(\d{1,2})(?:\.\d+)?)?)?
            (?:\s*(?:Z|[+-]\d{2}:?\d{2})(?:\s+[A-Za-z]+)?)?
        )?$",
    )
    .unwrap()
});

/// Parse a date string into a calendar date.
///
/// Supports:
/// - Date: "2024-03-01", "2024-3-1"
/// - Month or year: "2024-03" (first of month), "2024" (first of year)
/// - Date and time: "2024-03-01 15:04", "2024-03-01T15:04:05"
/// - With zone: "2024-03-01T15:04:05+02:00", "2024-03-01 00:00:00 +0200 CEST"
///
/// Only the calendar date is kept. A zone does not shift the date: the day
/// is the one written in the string.
pub fn parse_date(s: &str) -> Result<NaiveDate, OvertimeError> {
    let invalid = || OvertimeError::InvalidDate {
        field: "date",
        value: s.to_string(),
    };

    let caps = DATE_RE.captures(s.trim()).ok_or_else(invalid)?;
    let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let year = caps[1].parse::<i32>().map_err(|_| invalid())?;
    let month = number(2).unwrap_or(1);
    let day = number(3).unwrap_or(1);
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;

    if let Some(hour) = number(4) {
        let minute = number(5).unwrap_or(0);
        let second = number(6).unwrap_or(0);
        NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(invalid)?;
    }

    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_date("2024-03-01").unwrap(), date(2024, 3, 1));
    }

    #[test]
    fn test_parse_unpadded_date() {
        assert_eq!(parse_date("2024-3-9").unwrap(), date(2024, 3, 9));
    }

    #[test]
    fn test_parse_month_and_year_only() {
        assert_eq!(parse_date("2024-07").unwrap(), date(2024, 7, 1));
        assert_eq!(parse_date("2024").unwrap(), date(2024, 1, 1));
    }

    #[test]
    fn test_parse_date_with_time() {
        assert_eq!(parse_date("2024-03-01 15:04").unwrap(), date(2024, 3, 1));
        assert_eq!(parse_date("2024-03-01T15:04:05").unwrap(), date(2024, 3, 1));
        assert_eq!(parse_date("2024-03-01 23:59:59.999").unwrap(), date(2024, 3, 1));
    }

    #[test]
    fn test_parse_keeps_written_day_regardless_of_zone() {
        assert_eq!(
            parse_date("2024-03-31T23:30:00+02:00").unwrap(),
            date(2024, 3, 31)
        );
        assert_eq!(
            parse_date("2024-05-01 00:00:00 +0200 CEST").unwrap(),
            date(2024, 5, 1)
        );
        assert_eq!(parse_date("2024-05-01T00:00:00Z").unwrap(), date(2024, 5, 1));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_date("  2024-03-01\n").unwrap(), date(2024, 3, 1));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "yesterday", "03/01/2024", "2024-03-01 noon"] {
            assert!(
                matches!(parse_date(input), Err(OvertimeError::InvalidDate { .. })),
                "{input:?} should not parse"
            );
        }
    }

    #[test]
    fn test_parse_rejects_impossible_values() {
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("2024-00-10").is_err());
        assert!(parse_date("2024-03-01 24:00").is_err());
        assert!(parse_date("2024-03-01 12:60").is_err());
    }
}
