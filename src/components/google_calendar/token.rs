use crate::config::Config;
use crate::error::{upsert_error, AppResult};
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Tokens this close to expiry are refreshed before use
const EXPIRY_MARGIN_SECS: i64 = 60;
/// Lifetime assumed when the token endpoint does not say
const DEFAULT_EXPIRES_IN: i64 = 3600;

/// OAuth token as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Unix timestamp after which the access token is invalid
    pub expires_at: i64,
}

impl StoredToken {
    fn is_fresh(&self, now: i64) -> bool {
        self.expires_at > now + EXPIRY_MARGIN_SECS
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Supplies access tokens for the calendar API, refreshing them when they
/// expire. The first token has to be placed in `token_path` by hand.
#[derive(Clone)]
pub struct TokenManager {
    client: Client,
    token_path: PathBuf,
    token_url: String,
    client_id: String,
    client_secret: String,
    cached: Arc<RwLock<Option<StoredToken>>>,
}

impl TokenManager {
    pub fn new(config: &Config, client: Client) -> Self {
        Self {
            client,
            token_path: config.token_path.clone(),
            token_url: config.oauth_token_url.clone(),
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Get a valid access token, refreshing the stored one if needed
    pub async fn get_access_token(&self) -> AppResult<String> {
        let now = Utc::now().timestamp();

        if let Some(token) = self.cached.read().await.as_ref() {
            if token.is_fresh(now) {
                return Ok(token.access_token.clone());
            }
        }

        let mut cached = self.cached.write().await;
        let token = match cached.take() {
            Some(token) => token,
            None => self.read_token()?,
        };

        let token = if token.is_fresh(now) {
            token
        } else {
            let refreshed = self.refresh_token(&token).await?;
            self.save_token(&refreshed)?;
            refreshed
        };

        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    fn read_token(&self) -> AppResult<StoredToken> {
        debug!("Reading token from {}", self.token_path.display());

        let content = fs::read_to_string(&self.token_path).map_err(|e| {
            upsert_error(&format!(
                "No token at {}: {}. Store a token there before syncing.",
                self.token_path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            upsert_error(&format!(
                "Invalid token file {}: {}",
                self.token_path.display(),
                e
            ))
        })
    }

    fn save_token(&self, token: &StoredToken) -> AppResult<()> {
        if let Some(parent) = self.token_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.token_path, serde_json::to_string_pretty(token)?)?;
        Ok(())
    }

    /// Exchange the refresh token for a new access token
    async fn refresh_token(&self, token: &StoredToken) -> AppResult<StoredToken> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or_else(|| upsert_error("Token expired and no refresh token is stored"))?;

        info!("Refreshing calendar access token");

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
            .map_err(|e| upsert_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(upsert_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let refreshed: RefreshResponse = response
            .json()
            .await
            .map_err(|e| upsert_error(&format!("Failed to parse token response: {}", e)))?;

        // Google usually omits the refresh token on refresh; keep the old one
        Ok(StoredToken {
            access_token: refreshed.access_token,
            refresh_token: refreshed.refresh_token.or_else(|| token.refresh_token.clone()),
            expires_at: Utc::now().timestamp() + refreshed.expires_in.unwrap_or(DEFAULT_EXPIRES_IN),
        })
    }
}
