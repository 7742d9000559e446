//! Overtime computation.
//!
//! # Algorithm Summary
//!
//! 1. Resolve the configured workspace name to an id
//! 2. Fetch the summary report for the date range
//! 3. Sum logged time of the allowed projects
//! 4. Sum the work-day duration over the working days of the range
//! 5. Overtime is worked minus expected; negative means undertime

use chrono::TimeDelta;
use serde::Serialize;

use crate::aggregate::aggregate_worked_time;
use crate::duration::format_signed_duration;
use crate::error::OvertimeError;
use crate::expected::{expected_work_time, working_days};
use crate::types::{DateRange, OvertimeConfig, TimeEntrySummary};

/// Remote source of logged time.
///
/// This trait lets the computation work with the Toggl client or with test
/// fixtures. Implementations wrap their own failures in
/// [`OvertimeError::AccountLookup`] when listing workspaces and
/// [`OvertimeError::ReportFetch`] when fetching the report.
pub trait ReportService {
    /// Returns the id of the workspace called `name`.
    fn resolve_workspace(&self, name: &str) -> Result<u64, OvertimeError>;

    /// Returns per-project logged time for `range` in the given workspace.
    fn fetch_summary(
        &self,
        workspace_id: u64,
        range: &DateRange,
    ) -> Result<Vec<TimeEntrySummary>, OvertimeError>;
}

/// Result of an overtime computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OvertimeReport {
    pub range: DateRange,
    pub working_days: u32,
    pub worked: TimeDelta,
    pub expected: TimeDelta,
    pub overtime: TimeDelta,
}

/// Worked minus expected time. Negative values denote undertime.
///
/// # Errors
///
/// Returns [`OvertimeError::Overflow`] when the difference exceeds the
/// [`TimeDelta`] range.
pub fn overtime(worked: TimeDelta, expected: TimeDelta) -> Result<TimeDelta, OvertimeError> {
    worked
        .checked_sub(&expected)
        .ok_or(OvertimeError::Overflow {
            quantity: "overtime",
        })
}

/// Computes overtime for `config`, fetching logged time from `service`.
///
/// Any collaborator failure aborts the computation; nothing is retried.
pub fn compute_overtime<S>(config: &OvertimeConfig, service: &S) -> Result<OvertimeReport, OvertimeError>
where
    S: ReportService + ?Sized,
{
    let workspace_id = service.resolve_workspace(&config.workspace)?;
    tracing::debug!(workspace = %config.workspace, workspace_id, "resolved workspace");

    let entries = service.fetch_summary(workspace_id, &config.range)?;
    tracing::debug!(entries = entries.len(), range = %config.range, "fetched summary report");

    summarize(config, &entries)
}

/// Computes overtime from already fetched report entries.
///
/// # Errors
///
/// Returns [`OvertimeError::Overflow`] when a total does not fit in a
/// [`TimeDelta`].
pub fn summarize(
    config: &OvertimeConfig,
    entries: &[TimeEntrySummary],
) -> Result<OvertimeReport, OvertimeError> {
    let worked = aggregate_worked_time(entries, &config.allowed_projects)?;
    let expected = expected_work_time(&config.range, config.workday, &config.rules)?;
    let overtime = overtime(worked, expected)?;

    Ok(OvertimeReport {
        range: config.range,
        working_days: working_days(&config.range, &config.rules),
        worked,
        expected,
        overtime,
    })
}

/// Serializable view of an [`OvertimeReport`].
#[derive(Debug, Serialize)]
pub struct OvertimeSummary {
    pub start_date: String,
    pub end_date: String,
    pub working_days: u32,
    pub worked_ms: i64,
    pub expected_ms: i64,
    pub overtime_ms: i64,
    pub overtime: String,
}

impl From<&OvertimeReport> for OvertimeSummary {
    fn from(report: &OvertimeReport) -> Self {
        Self {
            start_date: report.range.start().to_string(),
            end_date: report.range.end().to_string(),
            working_days: report.working_days,
            worked_ms: report.worked.num_milliseconds(),
            expected_ms: report.expected.num_milliseconds(),
            overtime_ms: report.overtime.num_milliseconds(),
            overtime: format_signed_duration(report.overtime),
        }
    }
}
