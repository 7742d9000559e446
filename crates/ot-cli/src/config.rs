//! Configuration loading and management.
//!
//! Values are resolved from, lowest to highest precedence: built-in
//! defaults, the platform config file, the `--config` file, `TOGGL_OVERTIME_*`
//! environment variables and finally command-line flags.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use ot_core::{
    DateRange, ExclusionRules, OvertimeConfig, OvertimeError, parse_workday_duration,
};
use serde::{Deserialize, Deserializer, Serialize};

/// Prefix of the environment variables read into the configuration.
const ENV_PREFIX: &str = "TOGGL_OVERTIME_";

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Toggl API token.
    #[serde(
        default,
        deserialize_with = "optional_scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<String>,

    /// Name of the Toggl workspace.
    #[serde(deserialize_with = "scalar_string")]
    pub workspace: String,

    /// Projects whose logged time counts as work.
    #[serde(deserialize_with = "string_or_list")]
    pub projects: Vec<String>,

    /// Base duration of a working day, e.g. `8h`.
    #[serde(deserialize_with = "scalar_string")]
    pub work_day_duration: String,

    /// Weekday names that are not working days.
    #[serde(deserialize_with = "string_or_list")]
    pub non_working_days: Vec<String>,

    /// ISO dates that are not working days.
    #[serde(deserialize_with = "string_or_list")]
    pub exclude_dates: Vec<String>,

    /// Start of the period. Defaults to the first day of the current month.
    #[serde(
        default,
        deserialize_with = "optional_scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<String>,

    /// End of the period. Defaults to today.
    #[serde(
        default,
        deserialize_with = "optional_scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<String>,

    /// Toggl API base URL.
    #[serde(deserialize_with = "scalar_string")]
    pub api_url: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("workspace", &self.workspace)
            .field("projects", &self.projects)
            .field("work_day_duration", &self.work_day_duration)
            .field("non_working_days", &self.non_working_days)
            .field("exclude_dates", &self.exclude_dates)
            .field("start_date", &self.start_date)
            .field("end_date", &self.end_date)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            workspace: "Personal".to_string(),
            projects: vec!["Work".to_string()],
            work_day_duration: "8h".to_string(),
            non_working_days: vec!["Saturday".to_string(), "Sunday".to_string()],
            exclude_dates: Vec::new(),
            start_date: None,
            end_date: None,
            api_url: ot_toggl::DEFAULT_API_URL.to_string(),
        }
    }
}

/// Values set explicitly on the command line.
///
/// Unset fields are left out of the merged configuration, so they never mask
/// values from lower layers.
#[derive(Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_day_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_working_days: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_dates: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl fmt::Debug for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overrides")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("workspace", &self.workspace)
            .field("projects", &self.projects)
            .field("work_day_duration", &self.work_day_duration)
            .field("non_working_days", &self.non_working_days)
            .field("exclude_dates", &self.exclude_dates)
            .field("start_date", &self.start_date)
            .field("end_date", &self.end_date)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file, with `overrides` on top.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(
        config_path: Option<&Path>,
        overrides: &Overrides,
    ) -> Result<Self, figment::Error> {
        Self::figment(dirs_config_path(), config_path, overrides).extract()
    }

    /// Builds the layered provider chain.
    fn figment(
        config_dir: Option<PathBuf>,
        config_path: Option<&Path>,
        overrides: &Overrides,
    ) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = config_dir {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TOGGL_OVERTIME_*)
        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        // Command-line flags win
        figment.merge(Serialized::defaults(overrides.clone()))
    }

    /// Returns the API token, if one is configured.
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Validates the configuration into the immutable computation input.
    ///
    /// `today` supplies the default period: the first of its month through
    /// `today` itself.
    pub fn overtime_config(&self, today: NaiveDate) -> Result<OvertimeConfig, OvertimeError> {
        let start = self
            .start_date
            .clone()
            .unwrap_or_else(|| today.with_day(1).unwrap_or(today).to_string());
        let end = self.end_date.clone().unwrap_or_else(|| today.to_string());
        let range = DateRange::parse(&start, &end)?;

        let workday = parse_workday_duration(&self.work_day_duration)?;
        let rules = ExclusionRules::parse(&self.non_working_days, &self.exclude_dates)?;

        let allowed_projects: HashSet<String> = self
            .projects
            .iter()
            .map(|project| project.trim())
            .filter(|project| !project.is_empty())
            .map(str::to_string)
            .collect();
        if allowed_projects.is_empty() {
            tracing::warn!("no projects configured, worked time will be zero");
        }

        Ok(OvertimeConfig {
            workspace: self.workspace.clone(),
            allowed_projects,
            workday,
            rules,
            range,
        })
    }
}

/// A single configuration value.
///
/// Environment values that look like numbers or booleans (`2025`, `0`, `true`)
/// are parsed as such before they reach the string fields.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    String(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::String(value) => value,
            Self::Unsigned(value) => value.to_string(),
            Self::Signed(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Bool(value) => value.to_string(),
        }
    }
}

/// Accepts a string or any scalar written as one.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(Scalar::into_string)
}

fn optional_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

/// Accepts either a list or a comma-separated string.
///
/// Environment variables and single-valued TOML keys arrive as strings.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ScalarOrList {
        List(Vec<Scalar>),
        Scalar(Scalar),
    }

    Ok(match ScalarOrList::deserialize(deserializer)? {
        ScalarOrList::List(items) => items.into_iter().map(Scalar::into_string).collect(),
        ScalarOrList::Scalar(value) => value
            .into_string()
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

/// Returns the platform-specific config directory for toggl-overtime.
///
/// On Linux: `~/.config/toggl-overtime`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("toggl-overtime"))
}
