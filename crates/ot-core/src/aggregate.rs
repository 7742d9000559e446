//! Worked-time aggregation over summary report entries.

use std::collections::HashSet;

use chrono::TimeDelta;

use crate::error::OvertimeError;
use crate::types::TimeEntrySummary;

/// Sums the logged time of entries whose project is in `allowed_projects`.
///
/// Entries for other projects are ignored. The result does not depend on the
/// order of `entries`.
///
/// # Errors
///
/// Returns [`OvertimeError::Overflow`] when an entry or the total does not fit
/// in a [`TimeDelta`].
pub fn aggregate_worked_time(
    entries: &[TimeEntrySummary],
    allowed_projects: &HashSet<String>,
) -> Result<TimeDelta, OvertimeError> {
    let overflow = || OvertimeError::Overflow {
        quantity: "worked time",
    };

    let worked = entries
        .iter()
        .filter(|entry| allowed_projects.contains(&entry.project))
        .try_fold(TimeDelta::zero(), |total, entry| {
            entry
                .duration()
                .and_then(|duration| total.checked_add(&duration))
        })
        .ok_or_else(overflow)?;

    tracing::debug!(
        entries = entries.len(),
        allowed = allowed_projects.len(),
        worked_ms = worked.num_milliseconds(),
        "aggregated worked time"
    );

    Ok(worked)
}
