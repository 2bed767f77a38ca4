use crate::error::AppResult;
use crate::utils::time::ScanWindow;
use async_trait::async_trait;

// Export components
pub mod google_calendar;
pub mod jira;
pub mod token_store;
pub mod worklog_sync;

pub use google_calendar::{CalendarEvent, CalendarSession, GoogleCalendarClient, TokenManager};
pub use jira::{JiraClient, NewWorklog, WorklogEntry};
pub use worklog_sync::{sync_worklogs, RunSummary, SyncSettings};

/// Source of raw calendar events
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Events overlapping the window, recurrences expanded, ordered by start time
    async fn fetch_events(&self, window: &ScanWindow) -> AppResult<Vec<CalendarEvent>>;
}

/// Backend the worklogs are recorded in
#[async_trait]
pub trait WorkTracker: Send + Sync {
    /// Every worklog currently recorded on the task
    async fn list_worklogs(&self, task_id: &str) -> AppResult<Vec<WorklogEntry>>;

    /// Record a new worklog on the task
    async fn submit_worklog(&self, task_id: &str, worklog: &NewWorklog) -> AppResult<()>;
}
