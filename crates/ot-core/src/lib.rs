//! Core domain logic for toggl-overtime.
//!
//! This crate contains the overtime calculation:
//! - Aggregation: summing logged time of the allowed projects
//! - Expected work: counting working days in a date range
//! - Overtime: the signed difference between the two

mod aggregate;
pub mod date;
pub mod duration;
mod error;
mod expected;
mod overtime;
mod types;

pub use aggregate::aggregate_worked_time;
pub use date::parse_date;
pub use duration::{format_signed_duration, parse_workday_duration};
pub use error::{BoxError, OvertimeError};
pub use expected::{expected_work_time, working_days};
pub use overtime::{
    OvertimeReport, OvertimeSummary, ReportService, compute_overtime, overtime, summarize,
};
pub use types::{DateRange, ExclusionRules, ISO_DATE_FORMAT, OvertimeConfig, TimeEntrySummary};
