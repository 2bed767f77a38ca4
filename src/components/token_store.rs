use crate::config::CalendarConfig;
use crate::error::{AppResult, Error};
use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};
use serde_json::Value;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

// Redis key constants
pub mod keys {
    pub const GOOGLE_CALENDAR_TOKEN: &str = "google_calendar_token";
}

/// Persistent cache for the Google OAuth token
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the cached token, `None` when nothing has been saved yet
    async fn load(&self) -> AppResult<Option<Value>>;

    /// Replace the cached token
    async fn save(&self, token: &Value) -> AppResult<()>;
}

/// Pick the store the configuration asks for
pub fn from_config(config: &CalendarConfig) -> AppResult<Box<dyn TokenStore>> {
    match &config.redis_url {
        Some(url) => Ok(Box::new(RedisTokenStore::open(url)?)),
        None => Ok(Box::new(FileTokenStore::new(config.token_path.clone()))),
    }
}

/// Token kept as a JSON document on disk
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> AppResult<Option<Value>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No token file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let token = serde_json::from_str(&content).map_err(|e| {
            Error::TokenStore(format!(
                "Failed to parse token file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(Some(token))
    }

    async fn save(&self, token: &Value) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(token)?).await?;
        debug!("Token saved to {}", self.path.display());
        Ok(())
    }
}

/// Token kept under a single Redis key
#[derive(Debug, Clone)]
pub struct RedisTokenStore {
    client: RedisClient,
    key: String,
}

impl RedisTokenStore {
    pub fn open(url: &str) -> AppResult<Self> {
        Ok(Self {
            client: RedisClient::open(url)?,
            key: keys::GOOGLE_CALENDAR_TOKEN.to_string(),
        })
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn load(&self) -> AppResult<Option<Value>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let token_str: Option<String> = conn.get(&self.key).await?;

        token_str
            .map(|s| {
                serde_json::from_str(&s).map_err(|e| {
                    Error::TokenStore(format!("Failed to parse token JSON: {}", e))
                })
            })
            .transpose()
    }

    async fn save(&self, token: &Value) -> AppResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(&self.key, token.to_string()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("token.json"));

        assert!(store.load().await.unwrap().is_none());

        let token = json!({"access_token": "a", "refresh_token": "r", "expires_at": 10});
        store.save(&token).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(token));
    }

    #[tokio::test]
    async fn test_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileTokenStore::new(path).load().await.unwrap_err();
        assert!(matches!(err, Error::TokenStore(_)));
    }
}
