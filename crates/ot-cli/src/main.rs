use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ot_cli::report::{self, OutputFormat};
use ot_cli::{Cli, Config, TogglService};

/// Load config from all layers, with the command-line flags on top.
fn load_config(cli: &Cli) -> Result<Config> {
    if let Some(path) = cli.config.as_deref().filter(|path| !path.is_file()) {
        bail!("config file {} does not exist", path.display());
    }

    let config = Config::load_from(cli.config.as_deref(), &cli.overrides())
        .context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so stdout only carries the result
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = load_config(&cli)?;
    let today = Local::now().date_naive();
    let overtime_config = config
        .overtime_config(today)
        .context("invalid configuration")?;

    let Some(token) = config.token() else {
        bail!("missing Toggl API token (set --token, TOGGL_OVERTIME_TOKEN or token in config.toml)");
    };
    let service = TogglService::new(token, &config.api_url)?;

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let mut stdout = std::io::stdout().lock();
    report::run(&mut stdout, &overtime_config, &service, format)?;

    Ok(())
}
