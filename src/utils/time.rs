use chrono::{DateTime, Duration, LocalResult, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;

/// Time range the calendar is scanned over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ScanWindow {
    /// Lower bound formatted for the Calendar API (`timeMin`)
    pub fn time_min(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// Upper bound formatted for the Calendar API (`timeMax`)
    pub fn time_max(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Window from midnight `days` days ago (in `tz`) up to `now`
pub fn scan_window(now: DateTime<Utc>, days: u32, tz: Tz) -> ScanWindow {
    let local_now = now.with_timezone(&tz);
    let first_day = local_now.date_naive() - Duration::days(i64::from(days));
    let midnight = first_day.and_hms_opt(0, 0, 0).unwrap_or_default();

    let start = match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        // Midnight skipped by a DST jump, fall back to the UTC reading
        LocalResult::None => Utc.from_utc_datetime(&midnight),
    };

    ScanWindow { start, end: now }
}
