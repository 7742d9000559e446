//! Toggl Track API integration for toggl-overtime.
//!
//! Provides the two remote calls the overtime calculation needs:
//! - Workspace lookup for the authenticated account
//! - Summary report of logged time per project for a date range

use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use ot_core::{ISO_DATE_FORMAT, OvertimeError, TimeEntrySummary};
use serde::Deserialize;
use thiserror::Error;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Public Toggl Track endpoint.
pub const DEFAULT_API_URL: &str = "https://api.track.toggl.com";
/// Password half of basic auth when authenticating with an API token.
const API_TOKEN_PASSWORD: &str = "api_token";
/// Identifies this tool to the reports API, which requires a `user_agent`.
const USER_AGENT: &str = "toggl-overtime";

/// Toggl client errors.
#[derive(Debug, Error)]
pub enum TogglError {
    /// The provided API token was invalid.
    #[error("invalid API token: {reason}")]
    InvalidToken { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<TogglError> for OvertimeError {
    fn from(err: TogglError) -> Self {
        Self::report_fetch(err)
    }
}

/// A workspace of the authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Workspace {
    pub id: u64,
    pub name: String,
}

/// Returns the id of the workspace named `name`, if any.
///
/// Names are matched exactly. When several workspaces share a name, the last
/// one listed wins.
pub fn find_workspace_id(workspaces: &[Workspace], name: &str) -> Option<u64> {
    workspaces
        .iter()
        .rev()
        .find(|workspace| workspace.name == name)
        .map(|workspace| workspace.id)
}

/// Toggl Track API client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client for the public Toggl endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(token: impl Into<String>) -> Result<Self, TogglError> {
        Self::with_base_url(token, DEFAULT_API_URL)
    }

    /// Creates a new client talking to `base_url` instead of the public endpoint.
    pub fn with_base_url(
        token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, TogglError> {
        let token = token.into();

        // Validate token
        if token.is_empty() {
            return Err(TogglError::InvalidToken {
                reason: "API token cannot be empty",
            });
        }
        if token.trim().is_empty() {
            return Err(TogglError::InvalidToken {
                reason: "API token cannot be whitespace-only",
            });
        }

        // Build HTTP client with timeout
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(TogglError::ClientBuild)?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            token,
            base_url,
        })
    }

    /// Lists the workspaces of the authenticated account.
    pub async fn workspaces(&self) -> Result<Vec<Workspace>, TogglError> {
        let url = format!("{}/api/v9/me/workspaces", self.base_url);
        tracing::debug!(%url, "fetching workspaces");

        let body = self.get(self.http.get(&url)).await?;
        parse_workspaces(&body)
    }

    /// Fetches logged time per project between `since` and `until`, both inclusive.
    pub async fn summary_report(
        &self,
        workspace_id: u64,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<TimeEntrySummary>, TogglError> {
        let url = format!("{}/reports/api/v2/summary", self.base_url);
        let query = [
            ("workspace_id", workspace_id.to_string()),
            ("since", since.format(ISO_DATE_FORMAT).to_string()),
            ("until", until.format(ISO_DATE_FORMAT).to_string()),
            ("user_agent", USER_AGENT.to_string()),
        ];
        tracing::debug!(%url, workspace_id, %since, %until, "fetching summary report");

        let body = self.get(self.http.get(&url).query(&query)).await?;
        parse_summary(&body)
    }

    async fn get(&self, request: reqwest::RequestBuilder) -> Result<String, TogglError> {
        let response = request
            .basic_auth(&self.token, Some(API_TOKEN_PASSWORD))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::debug!(%status, "toggl request failed");
            return Err(parse_api_error(status.as_u16(), &body));
        }
        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    data: Vec<SummaryGroup>,
}

#[derive(Debug, Deserialize)]
struct SummaryGroup {
    title: SummaryTitle,
    /// Milliseconds.
    #[serde(default)]
    time: i64,
}

#[derive(Debug, Deserialize)]
struct SummaryTitle {
    project: Option<String>,
}

fn parse_workspaces(body: &str) -> Result<Vec<Workspace>, TogglError> {
    serde_json::from_str(body).map_err(|err| TogglError::InvalidResponse(err.to_string()))
}

fn parse_summary(body: &str) -> Result<Vec<TimeEntrySummary>, TogglError> {
    let payload: SummaryResponse =
        serde_json::from_str(body).map_err(|err| TogglError::InvalidResponse(err.to_string()))?;
    Ok(payload
        .data
        .into_iter()
        .map(|group| TimeEntrySummary::new(group.title.project.unwrap_or_default(), group.time))
        .collect())
}

fn parse_api_error(status: u16, body: &str) -> TogglError {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ErrorPayload {
        Nested { error: ErrorDetails },
        Message(String),
    }

    #[derive(Deserialize)]
    struct ErrorDetails {
        message: String,
    }

    let message = match serde_json::from_str::<ErrorPayload>(body) {
        Ok(ErrorPayload::Nested { error }) => error.message,
        Ok(ErrorPayload::Message(message)) => message,
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    };
    TogglError::Api { status, message }
}
