use super::models::{NewWorklog, WorklogEntry, WorklogPage};
use crate::components::WorkTracker;
use crate::config::JiraConfig;
use crate::error::{auth_error, tracker_error, AppResult, Error};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::debug;
use url::Url;

/// Jira REST v2 client using basic authentication
pub struct JiraClient {
    client: Client,
    base_url: Url,
    username: String,
    password: String,
}

impl JiraClient {
    pub fn new(config: &JiraConfig) -> AppResult<Self> {
        // A trailing slash keeps `join` from dropping a context path like /jira
        let base = format!("{}/", config.url.trim_end_matches('/'));
        let base_url = Url::parse(&base)
            .map_err(|e| tracker_error(&format!("Invalid Jira URL {}: {}", config.url, e)))?;

        Ok(Self {
            client: Client::new(),
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn worklog_url(&self, task_id: &str) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| tracker_error("Jira URL cannot be a base URL"))?
            .pop_if_empty()
            .extend(["rest", "api", "2", "issue", task_id, "worklog"]);
        Ok(url)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .basic_auth(&self.username, Some(&self.password))
            .header("Accept", "application/json")
    }

    async fn error_message(response: Response, action: &str) -> (StatusCode, String) {
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        (
            status,
            format!("Failed to {}: HTTP {} - {}", action, status, error_body),
        )
    }
}

fn is_auth_status(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

#[async_trait]
impl WorkTracker for JiraClient {
    async fn list_worklogs(&self, task_id: &str) -> AppResult<Vec<WorklogEntry>> {
        let url = self.worklog_url(task_id)?;
        let mut worklogs = Vec::new();
        let mut start_at: u64 = 0;

        loop {
            let response = self
                .authed(self.client.get(url.clone()))
                .query(&[("startAt", start_at.to_string())])
                .send()
                .await
                .map_err(|e| tracker_error(&format!("Failed to list worklogs: {}", e)))?;

            if !response.status().is_success() {
                let (status, message) = Self::error_message(response, "list worklogs").await;
                return Err(if is_auth_status(status) {
                    auth_error(&message)
                } else {
                    tracker_error(&message)
                });
            }

            let page: WorklogPage = response
                .json()
                .await
                .map_err(|e| tracker_error(&format!("Failed to parse worklogs: {}", e)))?;

            let received = page.worklogs.len() as u64;
            worklogs.extend(page.worklogs);

            // The server may cap the page size below what was asked for
            start_at = page.start_at + received;
            if received == 0 || start_at >= page.total {
                break;
            }
        }

        debug!("{} worklogs found on {}", worklogs.len(), task_id);
        Ok(worklogs)
    }

    async fn submit_worklog(&self, task_id: &str, worklog: &NewWorklog) -> AppResult<()> {
        let url = self.worklog_url(task_id)?;

        let response = self
            .authed(self.client.post(url))
            .json(worklog)
            .send()
            .await
            .map_err(|e| Error::SubmissionRejected(format!("Failed to send worklog: {}", e)))?;

        if !response.status().is_success() {
            let (status, message) = Self::error_message(response, "add worklog").await;
            return Err(if is_auth_status(status) {
                auth_error(&message)
            } else {
                Error::SubmissionRejected(message)
            });
        }

        Ok(())
    }
}
