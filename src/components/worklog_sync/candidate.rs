use super::time::{parse_event_timestamp, to_tracker_format};
use crate::components::google_calendar::CalendarEvent;
use crate::components::jira::NewWorklog;
use crate::error::{malformed_event, AppResult};
use chrono::{DateTime, FixedOffset};
use tracing::debug;

/// Eligible event with the values needed for matching and submission
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub event_id: String,
    pub comment: String,
    /// Original occurrence start for recurring instances, else the start
    pub effective_start: DateTime<FixedOffset>,
    /// `effective_start` in the tracker format
    pub started: String,
    pub duration_seconds: i64,
}

impl Candidate {
    /// Derive the candidate, failing with `MalformedEvent` on missing or bad fields
    pub fn from_event(event: &CalendarEvent) -> AppResult<Self> {
        let comment = event
            .summary
            .clone()
            .ok_or_else(|| malformed_event("Event has no summary"))?;

        let start_raw = event
            .start
            .date_time
            .as_deref()
            .ok_or_else(|| malformed_event("Event has no start dateTime"))?;
        let end_raw = event
            .end
            .date_time
            .as_deref()
            .ok_or_else(|| malformed_event("Event has no end dateTime"))?;

        let effective_raw = event
            .original_start_time
            .as_ref()
            .and_then(|original| original.date_time.as_deref())
            .unwrap_or(start_raw);

        let start = parse_event_timestamp(start_raw)?;
        let end = parse_event_timestamp(end_raw)?;
        let effective_start = parse_event_timestamp(effective_raw)?;

        // Duration is measured from the actual start, not the original occurrence
        let duration_seconds = (end - start).num_seconds();
        if duration_seconds < 0 {
            return Err(malformed_event(&format!(
                "Event ends before it starts ({} > {})",
                start_raw, end_raw
            )));
        }
        if effective_start > end {
            // Recurring instance moved earlier than its usual slot
            debug!(
                "Event {} was moved from {} to {}",
                event.id, effective_raw, start_raw
            );
        }

        Ok(Self {
            event_id: event.id.clone(),
            comment,
            started: to_tracker_format(&effective_start),
            effective_start,
            duration_seconds,
        })
    }

    /// Submission body for the tracker
    pub fn to_worklog(&self) -> NewWorklog {
        NewWorklog {
            comment: self.comment.clone(),
            started: self.started.clone(),
            time_spent_seconds: self.duration_seconds,
        }
    }
}
