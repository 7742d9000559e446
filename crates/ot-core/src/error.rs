//! Error types for the overtime calculation.

use thiserror::Error;

/// Boxed error from a report collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that abort an overtime computation.
///
/// None of these are retried; they are surfaced to the caller as-is.
#[derive(Debug, Error)]
pub enum OvertimeError {
    /// The named workspace is absent from the account's workspace list.
    #[error("workspace with name '{name}' does not exist")]
    WorkspaceNotFound { name: String },

    /// Listing the account's workspaces failed.
    #[error("could not get toggl account: {0}")]
    AccountLookup(#[source] BoxError),

    /// The remote summary report failed.
    #[error("could not get summary report: {0}")]
    ReportFetch(#[source] BoxError),

    /// A date string could not be parsed.
    #[error("invalid {field}: '{value}'")]
    InvalidDate { field: &'static str, value: String },

    /// A non-working day name is not a weekday.
    #[error("invalid non-working day: '{value}'")]
    InvalidWeekday { value: String },

    /// The work-day duration could not be parsed.
    #[error("invalid work-day duration '{value}': {reason}")]
    InvalidDuration { value: String, reason: &'static str },

    /// A computed duration does not fit the supported range.
    #[error("{quantity} is out of range")]
    Overflow { quantity: &'static str },
}

impl OvertimeError {
    /// Wraps a collaborator failure as [`OvertimeError::ReportFetch`].
    pub fn report_fetch(err: impl Into<BoxError>) -> Self {
        Self::ReportFetch(err.into())
    }

    /// Wraps a workspace listing failure as [`OvertimeError::AccountLookup`].
    pub fn account_lookup(err: impl Into<BoxError>) -> Self {
        Self::AccountLookup(err.into())
    }
}
