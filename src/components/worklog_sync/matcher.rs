use super::candidate::Candidate;
use crate::components::jira::WorklogEntry;

/// First existing worklog with the same start, comment and duration.
///
/// The tracker keeps no link back to calendar events, so the three fields
/// together act as the identity of a logged event.
pub fn find_duplicate<'a>(
    candidate: &Candidate,
    existing: &'a [WorklogEntry],
) -> Option<&'a WorklogEntry> {
    existing.iter().find(|worklog| {
        worklog.started == candidate.started
            && worklog.comment.as_deref() == Some(candidate.comment.as_str())
            && worklog.time_spent_seconds == candidate.duration_seconds
    })
}

pub fn is_duplicate(candidate: &Candidate, existing: &[WorklogEntry]) -> bool {
    find_duplicate(candidate, existing).is_some()
}
