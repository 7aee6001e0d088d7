mod client;
pub mod models;
pub mod token;

pub use client::GoogleCalendarClient;
pub use models::{CalendarEvent, ImportConfirmation};
pub use token::TokenManager;

use crate::components::event::NormalizedEvent;
use crate::error::AppResult;
use async_trait::async_trait;

/// A calendar that accepts events by identity key
///
/// Importing an event whose identity key already exists replaces that
/// entry; otherwise a new entry is created. Importing the same event twice
/// leaves one entry.
#[async_trait]
pub trait CalendarImporter: Send + Sync {
    async fn import_event(
        &self,
        calendar_id: &str,
        event: &NormalizedEvent,
    ) -> AppResult<ImportConfirmation>;
}
