use chrono::DateTime;
use chrono_tz::Tz;

/// Format of each half of the identity key
pub const IDENTITY_KEY_FORMAT: &str = "%Y%m%d%H%M%S";

/// An event ready to be handed to the calendar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEvent {
    pub summary: String,
    pub location: String,
    /// Page description followed by the host line
    pub description: String,
    pub start_at: DateTime<Tz>,
    pub end_at: DateTime<Tz>,
    /// Page the event was scraped from
    pub source_url: String,
    /// Fixed note marking the entry as generated from the website
    pub source_title: String,
    /// `yyyyMMddHHmmss/yyyyMMddHHmmss` of start and end. The calendar
    /// creates or updates by this key, so two distinct events with the same
    /// start and end collapse into one entry.
    pub identity_key: String,
}

impl NormalizedEvent {
    /// IANA name of the zone the event times are in
    pub fn time_zone(&self) -> &'static str {
        self.start_at.timezone().name()
    }
}

/// Build the identity key for an event spanning `start_at` to `end_at`
pub fn identity_key(start_at: &DateTime<Tz>, end_at: &DateTime<Tz>) -> String {
    format!(
        "{}/{}",
        start_at.format(IDENTITY_KEY_FORMAT),
        end_at.format(IDENTITY_KEY_FORMAT)
    )
}
