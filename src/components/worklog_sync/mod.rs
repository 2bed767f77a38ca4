mod candidate;
mod driver;
mod filter;
mod matcher;
mod summary;
pub mod time;

pub use candidate::Candidate;
pub use driver::run;
pub use filter::{filter_eligible, is_eligible};
pub use matcher::{find_duplicate, is_duplicate};
pub use summary::{EventFailure, RunSummary};

use super::{CalendarSource, WorkTracker};
use crate::config::Config;
use crate::error::AppResult;
use crate::utils::time::ScanWindow;
use std::future::ready;
use tracing::{error, info};

/// Everything a run needs besides its collaborators
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub task_id: String,
    pub ignored_events: Vec<String>,
    pub window: ScanWindow,
    /// Match against the tracker but never submit
    pub dry_run: bool,
}

impl SyncSettings {
    pub fn from_config(config: &Config, window: ScanWindow, dry_run: bool) -> Self {
        Self {
            task_id: config.jira.task.clone(),
            ignored_events: config.ignored_events.clone(),
            window,
            dry_run,
        }
    }
}

/// One full run: fetch, filter, match against existing worklogs, submit, summarize.
///
/// Fetch failures abort before anything is submitted.
pub async fn sync_worklogs(
    calendar: &dyn CalendarSource,
    tracker: &dyn WorkTracker,
    settings: &SyncSettings,
) -> AppResult<RunSummary> {
    let events = calendar.fetch_events(&settings.window).await?;
    let eligible = filter_eligible(&events, &settings.ignored_events);
    info!("{} of {} events are eligible for logging", eligible.len(), events.len());

    if eligible.is_empty() {
        info!("No available events");
        return Ok(RunSummary::default());
    }

    info!("Available events:");
    for event in &eligible {
        info!("  {}", event.describe());
    }

    let existing = tracker.list_worklogs(&settings.task_id).await?;
    info!(
        "{} worklogs already recorded on {}",
        existing.len(),
        settings.task_id
    );

    info!("logging has started...");
    let mut summary = if settings.dry_run {
        run(&eligible, &existing, |candidate| {
            info!(
                "Dry run: would log {}s for {} at {}",
                candidate.duration_seconds, candidate.comment, candidate.started
            );
            ready(Ok(()))
        })
        .await
    } else {
        let task_id = settings.task_id.as_str();
        run(&eligible, &existing, |candidate| {
            let worklog = candidate.to_worklog();
            async move { tracker.submit_worklog(task_id, &worklog).await }
        })
        .await
    };
    info!("logging has finished");

    if settings.dry_run {
        info!("Dry run, nothing was sent");
    }
    info!("{}", summary);

    if let Some(fatal) = summary.take_fatal() {
        error!("Run stopped early: {}", fatal);
        return Err(fatal);
    }

    Ok(summary)
}
