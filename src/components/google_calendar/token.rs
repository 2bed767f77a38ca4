use crate::components::token_store::TokenStore;
use crate::config::CalendarConfig;
use crate::error::{auth_error, AppResult};
use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};

/// Google OAuth token endpoint
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Seconds before expiry at which a token is already treated as stale
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Authenticated handle for the Calendar API, valid for one run
#[derive(Debug, Clone)]
pub struct CalendarSession {
    access_token: String,
}

impl CalendarSession {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

/// Produces calendar sessions from the cached OAuth token, refreshing it when needed
pub struct TokenManager {
    store: Box<dyn TokenStore>,
    client_id: String,
    client_secret: String,
    token_url: String,
    client: Client,
}

impl TokenManager {
    pub fn new(config: &CalendarConfig, store: Box<dyn TokenStore>) -> Self {
        Self {
            store,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Point token refreshes at another endpoint
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Get a session, either from the cached token or by refreshing it
    pub async fn session(&self) -> AppResult<CalendarSession> {
        let token = self.store.load().await?.ok_or_else(|| {
            auth_error("No calendar token found. Run get_calendar_token first.")
        })?;

        let token = match token.get("expires_at").and_then(|v| v.as_i64()) {
            Some(expiry) if expiry - EXPIRY_MARGIN_SECS > Utc::now().timestamp() => token,
            _ => {
                tracing::info!("Calendar token expired, refreshing");
                self.refresh_token(&token).await?
            }
        };

        let access_token = token
            .get("access_token")
            .and_then(|t| t.as_str())
            .ok_or_else(|| auth_error("No access token available"))?;

        Ok(CalendarSession::new(access_token))
    }

    /// Refresh an expired token and persist the result
    async fn refresh_token(&self, token: &Value) -> AppResult<Value> {
        let refresh_token = token
            .get("refresh_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| auth_error("No refresh token in token data"))?;

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| auth_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(auth_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let new_token: Value = response
            .json()
            .await
            .map_err(|e| auth_error(&format!("Failed to parse token response: {}", e)))?;

        let access_token = new_token
            .get("access_token")
            .cloned()
            .ok_or_else(|| auth_error("Token response missing 'access_token' field"))?;

        // Google only sends a new refresh token occasionally
        let refresh_token = new_token
            .get("refresh_token")
            .and_then(|v| v.as_str())
            .unwrap_or(refresh_token);

        let expires_in = new_token
            .get("expires_in")
            .and_then(|v| v.as_i64())
            .unwrap_or(3600);

        let token_data = json!({
            "access_token": access_token,
            "refresh_token": refresh_token,
            "expires_at": Utc::now().timestamp() + expires_in,
        });

        self.store.save(&token_data).await?;

        Ok(token_data)
    }
}
