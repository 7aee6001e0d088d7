#![allow(dead_code)]

use async_trait::async_trait;
use seminar_sync::components::event::NormalizedEvent;
use seminar_sync::components::event_listing::DocumentFetcher;
use seminar_sync::components::google_calendar::{CalendarImporter, ImportConfirmation};
use seminar_sync::config::Config;
use seminar_sync::error::{fetch_error, upsert_error, AppResult};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

pub const INDEX_BASE: &str = "http://seminars.test/list";
pub const EVENTS_PREFIX: &str = "http://seminars.test/events/";
pub const CALENDAR_ID: &str = "test-calendar";

/// Config pointing at the fake site
pub fn test_config() -> Config {
    let mut config = Config::new(CALENDAR_ID, "client-id", "client-secret");
    config.index_base_url = INDEX_BASE.to_string();
    config.events_prefix = EVENTS_PREFIX.to_string();
    config
}

pub fn index_url(page: u32) -> String {
    format!("{}/{}", INDEX_BASE, page)
}

pub fn event_url(slug: &str) -> String {
    format!("{}{}/", EVENTS_PREFIX, slug)
}

/// An index page linking to the given event slugs plus some unrelated links
pub fn index_page(slugs: &[&str]) -> String {
    let items: String = slugs
        .iter()
        .map(|slug| format!(r#"<li><a href="{}">{}</a></li>"#, event_url(slug), slug))
        .collect();
    format!(
        r#"<html><body>
        <nav><a href="http://seminars.test/about/">About</a></nav>
        <ul class="events">{}</ul>
        </body></html>"#,
        items
    )
}

pub const LAST_INDEX_PAGE: &str = r#"<html><body>
    <p>Sorry, there are no future events.</p>
    </body></html>"#;

/// Builder for event pages in the site's markup
#[derive(Debug, Clone)]
pub struct EventPage {
    pub title: Option<String>,
    pub date: String,
    pub time: String,
    pub contact: Option<String>,
    pub location: Option<(String, String)>,
}

impl EventPage {
    pub fn new(title: &str, date: &str, time: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            date: date.to_string(),
            time: time.to_string(),
            contact: Some("Prof. Jane Smith".to_string()),
            location: Some(("SES 238".to_string(), "845 W Taylor St".to_string())),
        }
    }

    pub fn without_title(mut self) -> Self {
        self.title = None;
        self
    }

    pub fn without_contact(mut self) -> Self {
        self.contact = None;
        self
    }

    pub fn without_location(mut self) -> Self {
        self.location = None;
        self
    }

    pub fn render(&self) -> String {
        let title = self
            .title
            .as_ref()
            .map(|title| format!("<h1>{}</h1>", title))
            .unwrap_or_default();
        let location = self
            .location
            .as_ref()
            .map(|(room, address)| {
                format!("<dt>Location</dt><dd>{}</dd><dt>Address</dt><dd>{}</dd>", room, address)
            })
            .unwrap_or_default();
        let contact = self
            .contact
            .as_ref()
            .map(|contact| format!("<dt>Contact</dt><dd>{}</dd>", contact))
            .unwrap_or_default();

        format!(
            r#"<html><body>
            <article class="post-type-event">
              {title}
              <p class="event-date">{date}</p>
              <p class="event-time">{time}</p>
              <div class="_details u-definition-list--table">
                <dl>
                  {location}
                  {contact}
                  <dt>Date posted</dt><dd>Apr 20, 2024</dd>
                  <dt>Date updated</dt><dd>Apr 22, 2024</dd>
                </dl>
              </div>
              <div class="_content"><p>Abstract of the talk.</p></div>
            </article>
            </body></html>"#,
            title = title,
            date = self.date,
            time = self.time,
            location = location,
            contact = contact,
        )
    }
}

/// Serves fixed pages and records every request
#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    pub fn with_event(self, slug: &str, page: &EventPage) -> Self {
        let url = event_url(slug);
        self.with_page(&url, &page.render())
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> AppResult<String> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| fetch_error(url, "connection reset by peer"))
    }
}

/// In-memory calendar with import-by-identity-key semantics
#[derive(Default)]
pub struct RecordingCalendar {
    entries: Mutex<BTreeMap<String, NormalizedEvent>>,
    submissions: Mutex<Vec<(String, String)>>,
    rejected_keys: HashSet<String>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl RecordingCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse imports of the given identity key
    pub fn rejecting(mut self, identity_key: &str) -> Self {
        self.rejected_keys.insert(identity_key.to_string());
        self
    }

    /// Cancel `token` once `count` events have been imported
    pub fn cancelling_after(mut self, count: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((count, token));
        self
    }

    /// Calendar ID and identity key of every submission, in order
    pub fn submissions(&self) -> Vec<(String, String)> {
        self.submissions.lock().unwrap().clone()
    }

    /// Stored entries keyed by identity key
    pub fn entries(&self) -> BTreeMap<String, NormalizedEvent> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarImporter for RecordingCalendar {
    async fn import_event(
        &self,
        calendar_id: &str,
        event: &NormalizedEvent,
    ) -> AppResult<ImportConfirmation> {
        if self.rejected_keys.contains(&event.identity_key) {
            return Err(upsert_error("HTTP 400 Bad Request - invalid event"));
        }

        self.submissions
            .lock()
            .unwrap()
            .push((calendar_id.to_string(), event.identity_key.clone()));
        let stored = {
            let mut entries = self.entries.lock().unwrap();
            entries.insert(event.identity_key.clone(), event.clone());
            entries.len()
        };

        if let Some((count, token)) = &self.cancel_after {
            if self.submissions.lock().unwrap().len() >= *count {
                token.cancel();
            }
        }

        Ok(ImportConfirmation {
            id: format!("entry-{}", stored),
            html_link: Some(format!("https://calendar.test/event/{}", event.identity_key)),
            ical_uid: Some(event.identity_key.clone()),
        })
    }
}
