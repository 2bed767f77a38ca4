use super::models::{CalendarEvent, EventsPage};
use super::token::CalendarSession;
use crate::components::CalendarSource;
use crate::config::CalendarConfig;
use crate::error::{auth_error, google_calendar_error, AppResult};
use crate::utils::time::ScanWindow;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info};
use url::Url;

/// Calendar API client bound to one authenticated session
pub struct GoogleCalendarClient<'s> {
    session: &'s CalendarSession,
    client: Client,
    api_base: String,
    calendar_id: String,
    max_results: u32,
}

impl<'s> GoogleCalendarClient<'s> {
    pub fn new(config: &CalendarConfig, session: &'s CalendarSession) -> Self {
        Self {
            session,
            client: Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            calendar_id: config.calendar_id.clone(),
            max_results: config.max_results,
        }
    }

    fn events_url(&self, window: &ScanWindow, page_token: Option<&str>) -> AppResult<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| google_calendar_error("Calendar API base cannot be a base URL"))?
            .pop_if_empty()
            .extend(["calendars", self.calendar_id.as_str(), "events"]);

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("timeMin", &window.time_min())
                .append_pair("timeMax", &window.time_max())
                .append_pair("maxResults", &self.max_results.to_string())
                .append_pair("singleEvents", "true")
                .append_pair("orderBy", "startTime");
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }

        Ok(url)
    }

    async fn fetch_page(
        &self,
        window: &ScanWindow,
        page_token: Option<&str>,
    ) -> AppResult<EventsPage> {
        let url = self.events_url(window, page_token)?;
        debug!("Fetching calendar events from {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(self.session.access_token())
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to fetch events: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            let message = format!("Failed to fetch events: HTTP {} - {}", status, error_body);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => auth_error(&message),
                _ => google_calendar_error(&message),
            });
        }

        response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse events response: {}", e)))
    }
}

#[async_trait]
impl CalendarSource for GoogleCalendarClient<'_> {
    async fn fetch_events(&self, window: &ScanWindow) -> AppResult<Vec<CalendarEvent>> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.fetch_page(window, page_token.as_deref()).await?;
            events.extend(page.items);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        info!("{} events extracted from google calendar", events.len());
        Ok(events)
    }
}
