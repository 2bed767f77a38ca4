use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Configuration error: {0}")]
    #[diagnostic(code(worklogger::config))]
    Config(String),

    #[error("Authentication error: {0}")]
    #[diagnostic(
        code(worklogger::auth),
        help("Run `get_calendar_token` again or check the Jira credentials")
    )]
    Auth(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(worklogger::google_calendar))]
    GoogleCalendar(String),

    #[error("Jira API error: {0}")]
    #[diagnostic(code(worklogger::tracker))]
    Tracker(String),

    #[error("Malformed event: {0}")]
    #[diagnostic(code(worklogger::malformed_event))]
    MalformedEvent(String),

    #[error("Worklog rejected: {0}")]
    #[diagnostic(code(worklogger::submission_rejected))]
    SubmissionRejected(String),

    #[error("Token store error: {0}")]
    #[diagnostic(code(worklogger::token_store))]
    TokenStore(String),

    #[error(transparent)]
    #[diagnostic(code(worklogger::http))]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    #[diagnostic(code(worklogger::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(worklogger::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(worklogger::other))]
    Other(String),
}

impl Error {
    /// Whether the error has to stop the whole run rather than a single event
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::MalformedEvent(_) | Error::SubmissionRejected(_)
        )
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::TokenStore(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create authentication errors
pub fn auth_error(message: &str) -> Error {
    Error::Auth(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create Jira errors
pub fn tracker_error(message: &str) -> Error {
    Error::Tracker(message.to_string())
}

/// Helper to create malformed event errors
pub fn malformed_event(message: &str) -> Error {
    Error::MalformedEvent(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_event_errors_are_not_fatal() {
        assert!(!malformed_event("no start").is_fatal());
        assert!(!Error::SubmissionRejected("HTTP 400".to_string()).is_fatal());
        assert!(auth_error("HTTP 401").is_fatal());
        assert!(tracker_error("HTTP 500").is_fatal());
    }
}
