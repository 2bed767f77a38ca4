use serde::{Deserialize, Serialize};

/// Worklog already recorded on the task
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WorklogEntry {
    pub id: Option<String>,
    /// Start in the tracker format, e.g. `2024-01-02T09:00:00.000+0000`
    pub started: String,
    pub comment: Option<String>,
    pub time_spent_seconds: i64,
}

/// Body of a worklog submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewWorklog {
    pub comment: String,
    pub started: String,
    pub time_spent_seconds: i64,
}

/// One page of `GET /issue/{key}/worklog`
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct WorklogPage {
    /// Offset of the first worklog on this page
    pub start_at: u64,
    pub total: u64,
    pub worklogs: Vec<WorklogEntry>,
}
