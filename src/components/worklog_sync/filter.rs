use crate::components::google_calendar::{CalendarEvent, EventStatus, ResponseStatus};

/// Events that represent confirmed, personally accepted, non-ignored work.
///
/// Input order is preserved and no event is modified. Missing optional fields
/// count as absent or false, so the filter never fails.
pub fn filter_eligible(events: &[CalendarEvent], ignored: &[String]) -> Vec<CalendarEvent> {
    events
        .iter()
        .filter(|event| is_eligible(event, ignored))
        .cloned()
        .collect()
}

/// Eligibility predicate for a single event
pub fn is_eligible(event: &CalendarEvent, ignored: &[String]) -> bool {
    if event.status != Some(EventStatus::Confirmed) {
        return false;
    }

    if event
        .summary
        .as_ref()
        .is_some_and(|summary| ignored.contains(summary))
    {
        return false;
    }

    event
        .attendees
        .iter()
        .flatten()
        .any(|attendee| attendee.is_self && attendee.response_status == Some(ResponseStatus::Accepted))
}
