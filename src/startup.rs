use crate::components::{
    sync_worklogs, token_store, GoogleCalendarClient, JiraClient, RunSummary, SyncSettings,
    TokenManager,
};
use crate::config::Config;
use crate::error::Error;
use crate::utils::time::scan_window;
use chrono::Utc;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config(path: Option<&Path>) -> miette::Result<Config> {
    let path = Config::resolve_path(path);
    info!("Config path = {}", path.display());

    match Config::load(&path) {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Authenticate against both services and run one sync
pub async fn run_sync(config: &Config, dry_run: bool) -> miette::Result<RunSummary> {
    let store = token_store::from_config(&config.calendar)?;
    let token_manager = TokenManager::new(&config.calendar, store);
    let session = token_manager.session().await?;

    let calendar = GoogleCalendarClient::new(&config.calendar, &session);
    let tracker = JiraClient::new(&config.jira)?;

    let window = scan_window(Utc::now(), config.scan_last_days, config.tz()?);
    info!(
        "Scanning calendar {} from {} to {}",
        config.calendar.calendar_id,
        window.time_min(),
        window.time_max()
    );

    let settings = SyncSettings::from_config(config, window, dry_run);
    let summary = sync_worklogs(&calendar, &tracker, &settings).await?;

    for failure in &summary.failures {
        error!("Failed: {} - {}", failure.description, failure.cause);
    }

    Ok(summary)
}
