//! Blocking adapter from the async Toggl client to the overtime computation.

use anyhow::{Context, Result};
use ot_core::{DateRange, OvertimeError, ReportService, TimeEntrySummary};
use ot_toggl::{Client, find_workspace_id};

/// Toggl-backed [`ReportService`].
///
/// Owns the tokio runtime that drives the client; each call blocks until the
/// request completes.
#[derive(Debug)]
pub struct TogglService {
    client: Client,
    runtime: tokio::runtime::Runtime,
}

impl TogglService {
    pub fn new(token: &str, api_url: &str) -> Result<Self> {
        let client =
            Client::with_base_url(token, api_url).context("failed to create Toggl client")?;
        let runtime =
            tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
        Ok(Self { client, runtime })
    }
}

impl ReportService for TogglService {
    fn resolve_workspace(&self, name: &str) -> Result<u64, OvertimeError> {
        let workspaces = self
            .runtime
            .block_on(self.client.workspaces())
            .map_err(OvertimeError::account_lookup)?;
        tracing::debug!(count = workspaces.len(), "listed workspaces");

        find_workspace_id(&workspaces, name).ok_or_else(|| OvertimeError::WorkspaceNotFound {
            name: name.to_string(),
        })
    }

    fn fetch_summary(
        &self,
        workspace_id: u64,
        range: &DateRange,
    ) -> Result<Vec<TimeEntrySummary>, OvertimeError> {
        let entries = self.runtime.block_on(self.client.summary_report(
            workspace_id,
            range.start(),
            range.end(),
        ))?;
        Ok(entries)
    }
}
