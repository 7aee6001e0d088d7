use crate::components::event::NormalizedEvent;
use serde::{Deserialize, Serialize};

/// Civil time format sent to the calendar; the zone goes in `timeZone`
pub const CALENDAR_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Request body for the `events.import` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub summary: String,
    pub location: String,
    pub description: String,
    pub source: EventSource,
    pub start: EventDateTime,
    pub end: EventDateTime,
    /// Import creates or replaces the entry with this UID
    #[serde(rename = "iCalUID")]
    pub ical_uid: String,
}

/// Link back to the page the event came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSource {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

impl From<&NormalizedEvent> for CalendarEvent {
    fn from(event: &NormalizedEvent) -> Self {
        let time_zone = event.time_zone().to_string();

        Self {
            summary: event.summary.clone(),
            location: event.location.clone(),
            description: event.description.clone(),
            source: EventSource {
                url: event.source_url.clone(),
                title: event.source_title.clone(),
            },
            start: EventDateTime {
                date_time: event.start_at.format(CALENDAR_DATETIME_FORMAT).to_string(),
                time_zone: time_zone.clone(),
            },
            end: EventDateTime {
                date_time: event.end_at.format(CALENDAR_DATETIME_FORMAT).to_string(),
                time_zone,
            },
            ical_uid: event.identity_key.clone(),
        }
    }
}

/// What the calendar returns for an imported event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportConfirmation {
    pub id: String,
    #[serde(default)]
    pub html_link: Option<String>,
    #[serde(rename = "iCalUID", default)]
    pub ical_uid: Option<String>,
}
