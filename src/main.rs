use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use worklogger::startup;

/// Log attended calendar meetings as Jira worklogs
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Match against Jira but do not submit anything
    #[arg(long, action, default_value = "false")]
    dry_run: bool,

    /// Override scan_last_days from the config
    #[arg(long)]
    days: Option<u32>,

    /// Override the Jira task from the config
    #[arg(long)]
    task: Option<String>,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    startup::init_logging()?;

    info!("Starting worklogger");

    // Load configuration
    let mut config = startup::load_config(cli.config.as_deref())?;
    if let Some(days) = cli.days {
        config.scan_last_days = days;
    }
    if let Some(task) = cli.task {
        config.jira.task = task;
        config.validate()?;
    }

    startup::run_sync(&config, cli.dry_run).await?;

    Ok(())
}
