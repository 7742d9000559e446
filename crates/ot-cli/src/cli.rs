//! Command-line argument definitions.

use std::fmt;
use std::path::PathBuf;

use clap::Parser;

use crate::config::Overrides;

/// Calculates overtime based on time logged with Toggl.
///
/// Every option can also be set in the config file or through
/// `TOGGL_OVERTIME_<OPTION>` environment variables; flags win over both.
#[derive(Parser)]
#[command(name = "toggl-overtime", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file (default is <config dir>/toggl-overtime/config.toml).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,

    /// Toggl API authorization token.
    #[arg(short, long)]
    pub token: Option<String>,

    /// Toggl workspace [default: Personal].
    #[arg(short, long)]
    pub workspace: Option<String>,

    /// Toggl projects counted as work [default: Work].
    #[arg(short, long, value_delimiter = ',')]
    pub projects: Option<Vec<String>>,

    /// Base duration of a working day, e.g. 8h or 7h30m [default: 8h].
    #[arg(short = 'd', long)]
    pub work_day_duration: Option<String>,

    /// Days of the week that shouldn't count as working days [default: Saturday,Sunday].
    #[arg(short, long, value_delimiter = ',')]
    pub non_working_days: Option<Vec<String>>,

    /// Dates (YYYY-MM-DD) that shouldn't count as working days.
    #[arg(short = 'x', long, value_delimiter = ',')]
    pub exclude_dates: Option<Vec<String>>,

    /// Start date of the period [default: first day of the current month].
    #[arg(short, long)]
    pub start_date: Option<String>,

    /// End date of the period [default: today].
    #[arg(short, long)]
    pub end_date: Option<String>,

    /// Toggl API base URL.
    #[arg(long)]
    pub api_url: Option<String>,
}

impl fmt::Debug for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("verbose", &self.verbose)
            .field("config", &self.config)
            .field("json", &self.json)
            .field("overrides", &self.overrides())
            .finish()
    }
}

impl Cli {
    /// Configuration values given explicitly on the command line.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            token: self.token.clone(),
            workspace: self.workspace.clone(),
            projects: self.projects.clone(),
            work_day_duration: self.work_day_duration.clone(),
            non_working_days: self.non_working_days.clone(),
            exclude_dates: self.exclude_dates.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            api_url: self.api_url.clone(),
        }
    }
}
