use super::models::{CalendarEvent, ImportConfirmation};
use super::token::TokenManager;
use super::CalendarImporter;
use crate::components::event::NormalizedEvent;
use crate::config::Config;
use crate::error::{other_error, upsert_error, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Imports events into Google Calendar
#[derive(Clone)]
pub struct GoogleCalendarClient {
    client: Client,
    token_manager: TokenManager,
    api_base: String,
}

impl GoogleCalendarClient {
    /// Create a client whose requests, token refreshes included, give up
    /// after `fetch_timeout_secs`
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()
            .map_err(|e| other_error(&format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            token_manager: TokenManager::new(config, client.clone()),
            client,
            api_base: config.calendar_api_base.clone(),
        })
    }

    /// `<api_base>/calendars/<calendar_id>/events/import`
    fn import_url(&self, calendar_id: &str) -> AppResult<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| upsert_error(&format!("Failed to parse URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| upsert_error("Calendar API base cannot take a path"))?
            .pop_if_empty()
            .extend(["calendars", calendar_id, "events", "import"]);

        Ok(url)
    }
}

#[async_trait]
impl CalendarImporter for GoogleCalendarClient {
    async fn import_event(
        &self,
        calendar_id: &str,
        event: &NormalizedEvent,
    ) -> AppResult<ImportConfirmation> {
        let url = self.import_url(calendar_id)?;
        let access_token = self.token_manager.get_access_token().await?;
        let body = CalendarEvent::from(event);

        debug!("Importing {} into {}", body.ical_uid, calendar_id);

        let response = self
            .client
            .post(url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| upsert_error(&format!("Failed to import event: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(upsert_error(&format!(
                "Failed to import event {}: HTTP {} - {}",
                body.ical_uid, status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| upsert_error(&format!("Failed to parse import response: {}", e)))
    }
}
