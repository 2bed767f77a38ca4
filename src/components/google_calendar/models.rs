use serde::{Deserialize, Serialize};

/// Calendar event as returned by the Calendar API `events.list`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub status: Option<EventStatus>,
    pub start: EventDateTime,
    pub end: EventDateTime,
    /// Start of the occurrence before it was moved, only set on recurring instances
    pub original_start_time: Option<EventDateTime>,
    pub attendees: Option<Vec<Attendee>>,
}

/// Either a timed (`dateTime`) or all-day (`date`) boundary
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EventDateTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Confirmed,
    Tentative,
    Cancelled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Attendee {
    pub email: Option<String>,
    #[serde(rename = "self")]
    pub is_self: bool,
    pub response_status: Option<ResponseStatus>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ResponseStatus {
    Accepted,
    Declined,
    NeedsAction,
    Tentative,
    #[serde(other)]
    Unknown,
}

/// One page of `events.list`
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct EventsPage {
    pub items: Vec<CalendarEvent>,
    pub next_page_token: Option<String>,
}

impl CalendarEvent {
    /// Short human description used in logs
    pub fn describe(&self) -> String {
        let start = self
            .start
            .date_time
            .as_deref()
            .or(self.start.date.as_deref())
            .unwrap_or("?");
        format!(
            "'{}' ({}) starting {}",
            self.summary.as_deref().unwrap_or("<no summary>"),
            self.id,
            start
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_google_event() {
        let event: CalendarEvent = serde_json::from_str(
            r#"{
                "id": "abc_20240102T090000Z",
                "status": "confirmed",
                "summary": "Standup",
                "start": {"dateTime": "2024-01-02T11:00:00+02:00", "timeZone": "Europe/Helsinki"},
                "end": {"dateTime": "2024-01-02T11:15:00+02:00"},
                "originalStartTime": {"dateTime": "2024-01-02T11:00:00+02:00"},
                "attendees": [
                    {"email": "boss@example.com", "responseStatus": "needsAction"},
                    {"email": "me@example.com", "self": true, "responseStatus": "accepted"}
                ],
                "hangoutLink": "https://meet.google.com/xyz"
            }"#,
        )
        .unwrap();

        assert_eq!(event.status, Some(EventStatus::Confirmed));
        assert_eq!(event.summary.as_deref(), Some("Standup"));
        assert_eq!(event.start.time_zone.as_deref(), Some("Europe/Helsinki"));
        assert!(event.original_start_time.is_some());
        let attendees = event.attendees.unwrap();
        assert!(!attendees[0].is_self);
        assert_eq!(attendees[0].response_status, Some(ResponseStatus::NeedsAction));
        assert!(attendees[1].is_self);
        assert_eq!(attendees[1].response_status, Some(ResponseStatus::Accepted));
    }

    #[test]
    fn test_sparse_event_uses_defaults() {
        let event: CalendarEvent =
            serde_json::from_str(r#"{"id": "x", "status": "someNewStatus"}"#).unwrap();

        assert_eq!(event.status, Some(EventStatus::Unknown));
        assert_eq!(event.summary, None);
        assert_eq!(event.attendees, None);
        assert_eq!(event.start, EventDateTime::default());
    }

    #[test]
    fn test_describe() {
        let event = CalendarEvent {
            id: "e1".to_string(),
            summary: Some("Retro".to_string()),
            start: EventDateTime {
                date: Some("2024-01-02".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(event.describe(), "'Retro' (e1) starting 2024-01-02");
    }
}
