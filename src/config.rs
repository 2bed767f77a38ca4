use crate::error::{config_error, AppResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file used when neither `--config` nor `WORKLOGGER_CONFIG` is given
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Google Calendar REST endpoint
pub const DEFAULT_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// How many days back from today the calendar is scanned
    #[serde(default = "default_scan_last_days")]
    pub scan_last_days: u32,
    /// Event summaries that are never logged (exact match)
    #[serde(default)]
    pub ignored_events: Vec<String>,
    /// Timezone used to find the midnight the scan window starts at
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub jira: JiraConfig,
    pub calendar: CalendarConfig,
}

/// Jira connection and target task
#[derive(Debug, Clone, Deserialize)]
pub struct JiraConfig {
    pub url: String,
    pub username: String,
    /// Password or API token, usually supplied through `JIRA_PASSWORD`
    #[serde(default)]
    pub password: String,
    /// Issue key every worklog is recorded against
    pub task: String,
}

/// Google Calendar OAuth client and token cache settings
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
    /// When set the OAuth token is cached in Redis instead of `token_path`
    #[serde(default)]
    pub redis_url: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_scan_last_days() -> u32 {
    7
}

fn default_timezone() -> String {
    String::from("UTC")
}

fn default_calendar_id() -> String {
    String::from("primary")
}

fn default_token_path() -> PathBuf {
    PathBuf::from("token.json")
}

fn default_max_results() -> u32 {
    2500
}

fn default_api_base() -> String {
    String::from(DEFAULT_CALENDAR_API_BASE)
}

impl Config {
    /// Resolve the config path from an explicit value, the environment or the default
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var("WORKLOGGER_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn load(path: &Path) -> AppResult<Self> {
        let config = Self::load_unvalidated(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Same as `load` but leaves checking the values to the caller
    pub fn load_unvalidated(path: &Path) -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let content = fs::read_to_string(path).map_err(|e| {
            config_error(&format!("Failed to read {}: {}", path.display(), e))
        })?;

        let mut config = Self::from_toml_str(&content)?;
        config.apply_env_overrides();

        Ok(config)
    }

    /// Parse configuration without touching the environment
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Secrets may live in the environment rather than the config file
    pub fn apply_env_overrides(&mut self) {
        if let Ok(password) = env::var("JIRA_PASSWORD").or_else(|_| env::var("JIRA_API_TOKEN")) {
            self.jira.password = password;
        }
        if let Ok(client_id) = env::var("GOOGLE_CLIENT_ID") {
            self.calendar.client_id = client_id;
        }
        if let Ok(client_secret) = env::var("GOOGLE_CLIENT_SECRET") {
            self.calendar.client_secret = client_secret;
        }
    }

    /// Check values that would otherwise fail halfway through a run
    pub fn validate(&self) -> AppResult<()> {
        if self.jira.task.trim().is_empty() {
            return Err(config_error("jira.task must not be empty"));
        }
        if self.jira.url.trim().is_empty() {
            return Err(config_error("jira.url must not be empty"));
        }
        if self.jira.username.trim().is_empty() {
            return Err(config_error("jira.username must not be empty"));
        }
        if self.jira.password.is_empty() {
            return Err(config_error(
                "Jira password missing, set jira.password or JIRA_PASSWORD",
            ));
        }
        if self.calendar.max_results == 0 {
            return Err(config_error("calendar.max_results must be positive"));
        }
        self.tz()?;
        Ok(())
    }

    /// The consent flow only needs the Google OAuth client
    pub fn validate_oauth_client(&self) -> AppResult<()> {
        if self.calendar.client_id.trim().is_empty() {
            return Err(config_error(
                "Google client id missing, set calendar.client_id or GOOGLE_CLIENT_ID",
            ));
        }
        if self.calendar.client_secret.trim().is_empty() {
            return Err(config_error(
                "Google client secret missing, set calendar.client_secret or GOOGLE_CLIENT_SECRET",
            ));
        }
        Ok(())
    }

    /// Parsed scan timezone
    pub fn tz(&self) -> AppResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Unknown timezone: {}", self.timezone)))
    }
}
