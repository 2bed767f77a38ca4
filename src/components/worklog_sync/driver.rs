use super::candidate::Candidate;
use super::matcher::find_duplicate;
use super::summary::RunSummary;
use crate::components::google_calendar::CalendarEvent;
use crate::components::jira::WorklogEntry;
use crate::error::AppResult;
use std::future::Future;
use tracing::{error, info, warn};

/// Match each eligible event against the worklog snapshot and submit the new ones.
///
/// `existing` is the snapshot taken before the run and is never extended, so
/// two identical events in one batch are both submitted. Events are handled
/// strictly in order and `submit` is awaited before the next one starts. A
/// failing event is recorded and skipped; only a fatal error stops the loop.
pub async fn run<F, Fut>(
    events: &[CalendarEvent],
    existing: &[WorklogEntry],
    mut submit: F,
) -> RunSummary
where
    F: FnMut(&Candidate) -> Fut,
    Fut: Future<Output = AppResult<()>>,
{
    let mut summary = RunSummary::new(events.len());

    for event in events {
        let candidate = match Candidate::from_event(event) {
            Ok(candidate) => candidate,
            Err(e) => {
                error!("Can not process event {}: {}", event.describe(), e);
                summary.record_failure(event.describe(), e);
                continue;
            }
        };

        if let Some(worklog) = find_duplicate(&candidate, existing) {
            info!(
                "Event {} which started {} will skip because item already exists (worklog {})",
                candidate.comment,
                candidate.started,
                worklog.id.as_deref().unwrap_or("?")
            );
            summary.record_skipped();
            continue;
        }

        match submit(&candidate).await {
            Ok(()) => {
                info!(
                    "Event {} which started {} was sent successfully",
                    candidate.comment, candidate.started
                );
                summary.record_submitted();
            }
            Err(e) => {
                error!("Can not process event {}: {}", event.describe(), e);
                let fatal = e.is_fatal();
                summary.record_failure(event.describe(), e);
                if fatal {
                    warn!(
                        "Stopping run, {} events left unprocessed",
                        summary.unprocessed()
                    );
                    break;
                }
            }
        }
    }

    summary
}
