use crate::error::{malformed_event, AppResult};
use chrono::{DateTime, FixedOffset};

/// Wall-clock part of the tracker timestamp, millisecond precision
const TRACKER_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Offset suffix the tracker expects on every timestamp
pub const TRACKER_OFFSET: &str = "+0000";

/// Parse a calendar `dateTime`, accepting `Z`, `+HH:MM` and `+HHMM` offsets
pub fn parse_event_timestamp(raw: &str) -> AppResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map_err(|e| malformed_event(&format!("Unparseable timestamp '{}': {}", raw, e)))
}

/// Tracker representation: wall-clock time, milliseconds, `+0000` suffix.
///
/// The source offset is dropped rather than converted, whatever its notation.
pub fn to_tracker_format(timestamp: &DateTime<FixedOffset>) -> String {
    format!(
        "{}{}",
        timestamp.naive_local().format(TRACKER_FORMAT),
        TRACKER_OFFSET
    )
}
