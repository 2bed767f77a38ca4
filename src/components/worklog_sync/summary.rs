use crate::error::Error;
use std::fmt;

/// An event that could not be logged and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFailure {
    pub description: String,
    pub cause: String,
}

/// Outcome counts of one run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub total: usize,
    pub submitted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failures: Vec<EventFailure>,
    /// Error that stopped the run early, if any
    pub fatal: Option<Error>,
}

impl RunSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn record_submitted(&mut self) {
        self.submitted += 1;
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Count a failed event; a fatal error is also kept for the caller
    pub fn record_failure(&mut self, description: String, error: Error) {
        self.failed += 1;
        self.failures.push(EventFailure {
            description,
            cause: error.to_string(),
        });
        if error.is_fatal() {
            self.fatal = Some(error);
        }
    }

    /// Events that were never reached because the run stopped early
    pub fn unprocessed(&self) -> usize {
        self.total - self.submitted - self.skipped - self.failed
    }

    pub fn take_fatal(&mut self) -> Option<Error> {
        self.fatal.take()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} events from {} were sent to jira ({} skipped, {} failed)",
            self.submitted, self.total, self.skipped, self.failed
        )
    }
}
