//! Core type definitions with validation.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};

use crate::date::parse_date;
use crate::error::OvertimeError;

/// Format used for excluded dates and report parameters.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Logged time for one project, as returned by a summary report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeEntrySummary {
    /// Project name. Entries without a project carry an empty name.
    pub project: String,

    /// Total logged time in milliseconds.
    pub duration_ms: i64,
}

impl TimeEntrySummary {
    pub fn new(project: impl Into<String>, duration_ms: i64) -> Self {
        Self {
            project: project.into(),
            duration_ms,
        }
    }

    /// Logged time as a duration, or `None` if it exceeds [`TimeDelta::MAX`].
    pub fn duration(&self) -> Option<TimeDelta> {
        TimeDelta::try_milliseconds(self.duration_ms)
    }
}

/// An inclusive range of calendar days.
///
/// The whole start day (from 00:00:00) and the whole end day (up to 23:59:59)
/// belong to the range. A range whose end precedes its start contains no days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Builds a range from user-supplied start and end date strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, OvertimeError> {
        let start = parse_date(start).map_err(|_| OvertimeError::InvalidDate {
            field: "start date",
            value: start.to_string(),
        })?;
        let end = parse_date(end).map_err(|_| OvertimeError::InvalidDate {
            field: "end date",
            value: end.to_string(),
        })?;
        Ok(Self::new(start, end))
    }

    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Number of calendar days in the range.
    pub fn num_days(&self) -> u32 {
        if self.is_empty() {
            return 0;
        }
        u32::try_from((self.end - self.start).num_days() + 1).unwrap_or(u32::MAX)
    }

    /// Iterates the calendar days of the range in order.
    ///
    /// Steps by calendar date, so daylight-saving transitions never skip or
    /// repeat a day.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format(ISO_DATE_FORMAT),
            self.end.format(ISO_DATE_FORMAT)
        )
    }
}

/// Days that do not count towards expected work time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionRules {
    pub excluded_weekdays: HashSet<Weekday>,
    pub excluded_dates: HashSet<NaiveDate>,
}

impl ExclusionRules {
    /// Builds rules from weekday names (`Saturday`, `sat`) and ISO dates.
    ///
    /// Blank entries are skipped.
    pub fn parse<W, D>(weekdays: W, dates: D) -> Result<Self, OvertimeError>
    where
        W: IntoIterator,
        W::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        let mut rules = Self::default();

        for name in weekdays {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            let weekday = Weekday::from_str(name).map_err(|_| OvertimeError::InvalidWeekday {
                value: name.to_string(),
            })?;
            rules.excluded_weekdays.insert(weekday);
        }

        for date in dates {
            let date = date.as_ref().trim();
            if date.is_empty() {
                continue;
            }
            let parsed = NaiveDate::parse_from_str(date, ISO_DATE_FORMAT).map_err(|_| {
                OvertimeError::InvalidDate {
                    field: "excluded date",
                    value: date.to_string(),
                }
            })?;
            rules.excluded_dates.insert(parsed);
        }

        Ok(rules)
    }

    /// Whether `day` is a non-working day.
    pub fn excludes(&self, day: NaiveDate) -> bool {
        self.excluded_weekdays.contains(&day.weekday()) || self.excluded_dates.contains(&day)
    }
}

/// Everything needed for one overtime computation.
///
/// Built once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct OvertimeConfig {
    /// Name of the workspace to report on.
    pub workspace: String,

    /// Projects whose logged time counts as work.
    pub allowed_projects: HashSet<String>,

    /// Expected work per working day.
    pub workday: TimeDelta,

    pub rules: ExclusionRules,

    pub range: DateRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_time_entry_duration_is_milliseconds() {
        let entry = TimeEntrySummary::new("Work", 5_400_000);
        assert_eq!(entry.duration(), Some(TimeDelta::minutes(90)));
    }

    #[test]
    fn test_time_entry_duration_out_of_range() {
        assert_eq!(TimeEntrySummary::new("Work", i64::MIN).duration(), None);
    }

    #[test]
    fn test_range_parse_rejects_bad_start() {
        let err = DateRange::parse("not a date", "2024-01-31").unwrap_err();
        assert!(matches!(
            err,
            OvertimeError::InvalidDate {
                field: "start date",
                ..
            }
        ));
    }

    #[test]
    fn test_range_parse_rejects_bad_end() {
        let err = DateRange::parse("2024-01-01", "2024-13-01").unwrap_err();
        assert!(matches!(
            err,
            OvertimeError::InvalidDate {
                field: "end date",
                ..
            }
        ));
    }

    #[test]
    fn test_range_single_day() {
        let range = DateRange::new(date(2024, 3, 5), date(2024, 3, 5));
        assert_eq!(range.num_days(), 1);
        assert_eq!(range.days().collect::<Vec<_>>(), vec![date(2024, 3, 5)]);
    }

    #[test]
    fn test_range_reversed_is_empty() {
        let range = DateRange::new(date(2024, 3, 5), date(2024, 3, 4));
        assert!(range.is_empty());
        assert_eq!(range.num_days(), 0);
        assert_eq!(range.days().count(), 0);
    }

    #[test]
    fn test_range_crosses_month_and_leap_day() {
        let range = DateRange::new(date(2024, 2, 27), date(2024, 3, 2));
        let days: Vec<_> = range.days().collect();
        assert_eq!(days.len(), 5);
        assert!(days.contains(&date(2024, 2, 29)));
    }

    #[test]
    fn test_range_display() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(range.to_string(), "2024-01-01..2024-01-31");
    }

    #[test]
    fn test_exclusion_rules_accept_full_and_short_names() {
        let rules = ExclusionRules::parse(["Saturday", "sun", " "], Vec::<String>::new()).unwrap();
        assert_eq!(
            rules.excluded_weekdays,
            HashSet::from([Weekday::Sat, Weekday::Sun])
        );
    }

    #[test]
    fn test_exclusion_rules_reject_unknown_weekday() {
        let err = ExclusionRules::parse(["Caturday"], Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, OvertimeError::InvalidWeekday { value } if value == "Caturday"));
    }

    #[test]
    fn test_exclusion_rules_skip_blank_dates() {
        // The historic default for excluded dates was a single empty string.
        let rules = ExclusionRules::parse(Vec::<String>::new(), [""]).unwrap();
        assert!(rules.excluded_dates.is_empty());
    }

    #[test]
    fn test_exclusion_rules_reject_non_iso_date() {
        let err = ExclusionRules::parse(Vec::<String>::new(), ["24.12.2024"]).unwrap_err();
        assert!(matches!(
            err,
            OvertimeError::InvalidDate {
                field: "excluded date",
                ..
            }
        ));
    }

    #[test]
    fn test_excludes_by_weekday_or_date() {
        let rules = ExclusionRules::parse(["Sunday"], ["2024-12-25"]).unwrap();
        assert!(rules.excludes(date(2024, 12, 22))); // Sunday
        assert!(rules.excludes(date(2024, 12, 25))); // Wednesday, listed
        assert!(!rules.excludes(date(2024, 12, 24)));
    }
}
