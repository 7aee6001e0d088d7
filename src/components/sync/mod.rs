//! Runs the whole pipeline: discover links, then scrape, normalize and import
//! each event in turn.

mod report;

pub use report::{ImportedEvent, LinkFailure, SyncReport};

use crate::components::event::{assemble, NormalizedEvent};
use crate::components::event_listing::{discover_links, extract_event, DocumentFetcher};
use crate::components::event_times::normalize;
use crate::components::google_calendar::{CalendarImporter, ImportConfirmation};
use crate::config::Config;
use crate::error::{config_error, AppResult, Error};
use std::str::FromStr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// What to do when one event cannot be synced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failure, record it and go on with the next link
    #[default]
    Isolate,
    /// Stop the run at the first failure
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "isolate" => Ok(Self::Isolate),
            "abort" => Ok(Self::Abort),
            other => Err(config_error(&format!(
                "Unknown failure policy {:?}, expected \"isolate\" or \"abort\"",
                other
            ))),
        }
    }
}

/// Drives one sync run
pub struct SyncDriver {
    config: Arc<Config>,
    fetcher: Arc<dyn DocumentFetcher>,
    calendar: Arc<dyn CalendarImporter>,
    cancel: CancellationToken,
}

impl SyncDriver {
    pub fn new(
        config: Arc<Config>,
        fetcher: Arc<dyn DocumentFetcher>,
        calendar: Arc<dyn CalendarImporter>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            fetcher,
            calendar,
            cancel,
        }
    }

    /// Discover every event link and import each event.
    ///
    /// A discovery failure ends the run with an error. Per-event failures
    /// follow the configured [`FailurePolicy`]. Cancellation is checked
    /// between links, so an event is never left half-submitted.
    pub async fn run(&self) -> AppResult<SyncReport> {
        let mut report = SyncReport::default();

        let links = match discover_links(self.fetcher.as_ref(), &self.config, &self.cancel).await {
            Ok(links) => links,
            Err(Error::Cancelled) => {
                warn!("Sync cancelled during link discovery");
                report.cancelled = true;
                return Ok(report);
            }
            Err(e) => return Err(e),
        };

        report.discovered = links.len();
        info!("Discovered {} event links", links.len());

        for link in &links {
            if self.cancel.is_cancelled() {
                warn!(
                    "Sync cancelled with {} of {} links processed",
                    report.processed(),
                    links.len()
                );
                report.cancelled = true;
                break;
            }

            match self.sync_link(link).await {
                Ok((event, confirmation)) => {
                    info!("Imported \"{}\" ({})", event.summary, event.identity_key);
                    if let Some(html_link) = &confirmation.html_link {
                        debug!("Exported to {}", html_link);
                    }
                    report.imported.push(ImportedEvent {
                        source_url: link.clone(),
                        identity_key: event.identity_key,
                        html_link: confirmation.html_link,
                    });
                }
                Err(e) => match self.config.failure_policy {
                    FailurePolicy::Isolate => {
                        error!("Failed to sync {}: {}", link, e);
                        report.failures.push(LinkFailure {
                            source_url: link.clone(),
                            error: e.to_string(),
                        });
                    }
                    FailurePolicy::Abort => {
                        error!("Failed to sync {}, aborting: {}", link, e);
                        return Err(e);
                    }
                },
            }
        }

        info!(
            "Sync finished: {} imported, {} failed",
            report.succeeded(),
            report.failed()
        );
        Ok(report)
    }

    /// Fetch, extract, normalize, assemble and import one event
    async fn sync_link(&self, url: &str) -> AppResult<(NormalizedEvent, ImportConfirmation)> {
        let event = self.build_event(url).await?;
        let confirmation = self
            .calendar
            .import_event(&self.config.calendar_id, &event)
            .await?;
        Ok((event, confirmation))
    }

    /// Scrape one event page into a calendar-ready event
    async fn build_event(&self, url: &str) -> AppResult<NormalizedEvent> {
        let body = self.fetcher.fetch(url).await?;
        let fields = extract_event(&body, url)?;
        debug!("Title: {}", fields.title);

        let times = normalize(
            &fields.date_text,
            &fields.time_text,
            &fields.created_text,
            &fields.modified_text,
            self.config.timezone,
            self.config.repair_mode,
        )?;
        if times.end_at <= times.start_at {
            warn!(
                "{} still ends before it starts after repair ({} - {})",
                url, times.start_at, times.end_at
            );
        }
        debug!(
            "Posted {}, updated {}",
            times.created_at.date_naive(),
            times.modified_at.date_naive()
        );

        Ok(assemble(&fields, &times, &self.config.provenance_title))
    }
}
