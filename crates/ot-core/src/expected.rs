//! Expected work time over a date range.

use chrono::TimeDelta;

use crate::error::OvertimeError;
use crate::types::{DateRange, ExclusionRules};

/// Counts the days of `range` that are not excluded by `rules`.
pub fn working_days(range: &DateRange, rules: &ExclusionRules) -> u32 {
    let count = range.days().filter(|day| !rules.excludes(*day)).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Sums `workday` over every working day of `range`.
///
/// Days are visited by calendar date from the start day through the end day,
/// both inclusive. A day is skipped when its weekday or its date is excluded.
///
/// # Errors
///
/// Returns [`OvertimeError::Overflow`] when the total exceeds the
/// [`TimeDelta`] range.
pub fn expected_work_time(
    range: &DateRange,
    workday: TimeDelta,
    rules: &ExclusionRules,
) -> Result<TimeDelta, OvertimeError> {
    if range.is_empty() {
        tracing::warn!(%range, "end date precedes start date, no working days");
        return Ok(TimeDelta::zero());
    }

    let days = working_days(range, rules);
    tracing::debug!(
        %range,
        calendar_days = range.num_days(),
        working_days = days,
        "computed working days"
    );

    i32::try_from(days)
        .ok()
        .and_then(|days| workday.checked_mul(days))
        .filter(|total| (TimeDelta::MIN..=TimeDelta::MAX).contains(total))
        .ok_or(OvertimeError::Overflow {
            quantity: "expected work time",
        })
}
