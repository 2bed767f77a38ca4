use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::Mutex;
use worklogger::components::google_calendar::{
    Attendee, CalendarEvent, EventDateTime, EventStatus, ResponseStatus,
};
use worklogger::components::{
    sync_worklogs, CalendarSource, NewWorklog, SyncSettings, WorkTracker, WorklogEntry,
};
use worklogger::error::{google_calendar_error, tracker_error, AppResult, Error};
use worklogger::utils::time::{scan_window, ScanWindow};

/// Mock calendar returning a fixed list of events
struct MockCalendar {
    events: AppResult<Vec<CalendarEvent>>,
}

impl MockCalendar {
    fn with_events(events: Vec<CalendarEvent>) -> Self {
        Self { events: Ok(events) }
    }

    fn failing() -> Self {
        Self {
            events: Err(google_calendar_error("HTTP 500")),
        }
    }
}

#[async_trait]
impl CalendarSource for MockCalendar {
    async fn fetch_events(&self, _window: &ScanWindow) -> AppResult<Vec<CalendarEvent>> {
        match &self.events {
            Ok(events) => Ok(events.clone()),
            Err(e) => Err(google_calendar_error(&e.to_string())),
        }
    }
}

/// Mock tracker that remembers what it received, like a real backend would
#[derive(Default)]
struct MockTracker {
    worklogs: Mutex<Vec<WorklogEntry>>,
    submissions: Mutex<Vec<NewWorklog>>,
    fail_listing: bool,
    reject_comment: Option<String>,
}

impl MockTracker {
    fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }
}

#[async_trait]
impl WorkTracker for MockTracker {
    async fn list_worklogs(&self, _task_id: &str) -> AppResult<Vec<WorklogEntry>> {
        if self.fail_listing {
            return Err(tracker_error("HTTP 503"));
        }
        Ok(self.worklogs.lock().unwrap().clone())
    }

    async fn submit_worklog(&self, task_id: &str, worklog: &NewWorklog) -> AppResult<()> {
        assert_eq!(task_id, "OPS-42");
        if self.reject_comment.as_deref() == Some(worklog.comment.as_str()) {
            return Err(Error::SubmissionRejected("HTTP 400".to_string()));
        }

        self.submissions.lock().unwrap().push(worklog.clone());
        self.worklogs.lock().unwrap().push(WorklogEntry {
            id: None,
            started: worklog.started.clone(),
            comment: Some(worklog.comment.clone()),
            time_spent_seconds: worklog.time_spent_seconds,
        });
        Ok(())
    }
}

fn accepted_event(id: &str, summary: &str, start: &str, end: &str) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        summary: Some(summary.to_string()),
        status: Some(EventStatus::Confirmed),
        start: EventDateTime {
            date_time: Some(start.to_string()),
            ..Default::default()
        },
        end: EventDateTime {
            date_time: Some(end.to_string()),
            ..Default::default()
        },
        original_start_time: None,
        attendees: Some(vec![Attendee {
            email: Some("me@example.com".to_string()),
            is_self: true,
            response_status: Some(ResponseStatus::Accepted),
        }]),
    }
}

fn settings() -> SyncSettings {
    let now = Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();
    SyncSettings {
        task_id: "OPS-42".to_string(),
        ignored_events: vec!["Lunch".to_string()],
        window: scan_window(now, 7, chrono_tz::UTC),
        dry_run: false,
    }
}

fn week() -> Vec<CalendarEvent> {
    let mut declined = accepted_event("d", "Planning", "2024-01-03T10:00:00Z", "2024-01-03T11:00:00Z");
    declined.attendees.as_mut().unwrap()[0].response_status = Some(ResponseStatus::Declined);

    let mut cancelled = accepted_event("c", "Demo", "2024-01-03T14:00:00Z", "2024-01-03T15:00:00Z");
    cancelled.status = Some(EventStatus::Cancelled);

    vec![
        accepted_event("s1", "Standup", "2024-01-02T09:00:00+0000", "2024-01-02T09:15:00+0000"),
        accepted_event("l1", "Lunch", "2024-01-02T12:00:00Z", "2024-01-02T13:00:00Z"),
        declined,
        cancelled,
        accepted_event("r1", "Retro", "2024-01-04T15:00:00+02:00", "2024-01-04T16:00:00+02:00"),
    ]
}

/// Standup with no prior worklogs is submitted once, then skipped on the re-run
#[tokio::test]
async fn test_standup_scenario() {
    let standup = accepted_event(
        "s1",
        "Standup",
        "2024-01-02T09:00:00+0000",
        "2024-01-02T09:15:00+0000",
    );
    let calendar = MockCalendar::with_events(vec![standup]);
    let tracker = MockTracker::default();

    let first = sync_worklogs(&calendar, &tracker, &settings()).await.unwrap();
    assert_eq!(
        (first.submitted, first.skipped, first.failed, first.total),
        (1, 0, 0, 1)
    );
    assert_eq!(
        tracker.submissions.lock().unwrap()[0],
        NewWorklog {
            comment: "Standup".to_string(),
            started: "2024-01-02T09:00:00.000+0000".to_string(),
            time_spent_seconds: 900,
        }
    );

    let second = sync_worklogs(&calendar, &tracker, &settings()).await.unwrap();
    assert_eq!(
        (second.submitted, second.skipped, second.failed, second.total),
        (0, 1, 0, 1)
    );
    assert_eq!(tracker.submission_count(), 1);
}

/// A second run over the same week submits nothing new
#[tokio::test]
async fn test_second_run_is_idempotent() {
    let calendar = MockCalendar::with_events(week());
    let tracker = MockTracker::default();

    let first = sync_worklogs(&calendar, &tracker, &settings()).await.unwrap();
    assert_eq!((first.total, first.submitted), (2, 2));

    let second = sync_worklogs(&calendar, &tracker, &settings()).await.unwrap();
    assert_eq!((second.total, second.submitted, second.skipped), (2, 0, 2));
    assert_eq!(tracker.submission_count(), 2);
}

/// The unparseable event in the middle fails alone
#[tokio::test]
async fn test_malformed_event_is_isolated() {
    let calendar = MockCalendar::with_events(vec![
        accepted_event("1", "One", "2024-01-02T09:00:00Z", "2024-01-02T10:00:00Z"),
        accepted_event("2", "Two", "Tuesday 11am", "2024-01-02T12:00:00Z"),
        accepted_event("3", "Three", "2024-01-02T13:00:00Z", "2024-01-02T14:00:00Z"),
    ]);
    let tracker = MockTracker::default();

    let summary = sync_worklogs(&calendar, &tracker, &settings()).await.unwrap();

    assert_eq!(
        (summary.submitted, summary.failed, summary.total),
        (2, 1, 3)
    );
    let comments: Vec<String> = tracker
        .submissions
        .lock()
        .unwrap()
        .iter()
        .map(|w| w.comment.clone())
        .collect();
    assert_eq!(comments, vec!["One", "Three"]);
}

/// A rejected submission is reported but the rest of the batch goes through
#[tokio::test]
async fn test_rejected_submission_is_isolated() {
    let calendar = MockCalendar::with_events(week());
    let tracker = MockTracker {
        reject_comment: Some("Standup".to_string()),
        ..Default::default()
    };

    let summary = sync_worklogs(&calendar, &tracker, &settings()).await.unwrap();

    assert_eq!((summary.submitted, summary.failed), (1, 1));
    assert!(summary.failures[0].description.contains("Standup"));
}

/// Without the calendar there is nothing safe to do
#[tokio::test]
async fn test_calendar_failure_is_fatal() {
    let tracker = MockTracker::default();

    let err = sync_worklogs(&MockCalendar::failing(), &tracker, &settings())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::GoogleCalendar(_)));
    assert_eq!(tracker.submission_count(), 0);
}

/// Without the existing worklogs duplicates cannot be detected
#[tokio::test]
async fn test_worklog_listing_failure_is_fatal() {
    let calendar = MockCalendar::with_events(week());
    let tracker = MockTracker {
        fail_listing: true,
        ..Default::default()
    };

    let err = sync_worklogs(&calendar, &tracker, &settings())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Tracker(_)));
    assert_eq!(tracker.submission_count(), 0);
}

/// Dry runs count would-be submissions but never call the tracker
#[tokio::test]
async fn test_dry_run_submits_nothing() {
    let calendar = MockCalendar::with_events(week());
    let tracker = MockTracker::default();
    let settings = SyncSettings {
        dry_run: true,
        ..settings()
    };

    let summary = sync_worklogs(&calendar, &tracker, &settings).await.unwrap();

    assert_eq!(summary.submitted, 2);
    assert_eq!(tracker.submission_count(), 0);
}

/// Nothing eligible means the tracker is not even asked for worklogs
#[tokio::test]
async fn test_no_available_events() {
    let calendar = MockCalendar::with_events(vec![accepted_event(
        "l1",
        "Lunch",
        "2024-01-02T12:00:00Z",
        "2024-01-02T13:00:00Z",
    )]);
    let tracker = MockTracker {
        fail_listing: true,
        ..Default::default()
    };

    let summary = sync_worklogs(&calendar, &tracker, &settings()).await.unwrap();
    assert_eq!(summary.total, 0);
}

/// A weekly sync moved from 10:00 to 08:00 is logged under its usual slot
#[tokio::test]
async fn test_recurring_instance_moved_earlier_is_logged() {
    let mut moved = accepted_event(
        "w1_20240102",
        "Weekly sync",
        "2024-01-02T08:00:00+02:00",
        "2024-01-02T08:30:00+02:00",
    );
    moved.original_start_time = Some(EventDateTime {
        date_time: Some("2024-01-02T10:00:00+02:00".to_string()),
        ..Default::default()
    });
    let calendar = MockCalendar::with_events(vec![moved]);
    let tracker = MockTracker::default();

    let summary = sync_worklogs(&calendar, &tracker, &settings()).await.unwrap();

    assert_eq!((summary.submitted, summary.failed), (1, 0));
    assert_eq!(
        tracker.submissions.lock().unwrap()[0],
        NewWorklog {
            comment: "Weekly sync".to_string(),
            started: "2024-01-02T10:00:00.000+0000".to_string(),
            time_spent_seconds: 1800,
        }
    );
}
