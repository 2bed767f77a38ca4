mod client;
pub mod models;

pub use client::JiraClient;
pub use models::{NewWorklog, WorklogEntry};
