use crate::components::{GoogleCalendarClient, HttpFetcher, SyncDriver};
use crate::config::Config;
use crate::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn,html5ever=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Arc<Config>> {
    match Config::load() {
        Ok(config) => {
            info!(
                "Syncing {} into calendar {} ({})",
                config.index_base_url,
                config.calendar_id,
                config.timezone.name()
            );
            Ok(Arc::new(config))
        }
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Wire up the HTTP fetcher and calendar client and run one sync
pub async fn run_sync(config: Arc<Config>, cancel: CancellationToken) -> miette::Result<()> {
    let fetcher = HttpFetcher::new(Duration::from_secs(config.fetch_timeout_secs))?;
    let calendar = GoogleCalendarClient::new(&config)?;

    let driver = SyncDriver::new(
        Arc::clone(&config),
        Arc::new(fetcher),
        Arc::new(calendar),
        cancel,
    );

    let report = driver.run().await?;

    for failure in &report.failures {
        warn!("Not synced: {} ({})", failure.source_url, failure.error);
    }

    if report.cancelled {
        info!(
            "Stopped early after {} of {} events; the next run picks up the rest",
            report.processed(),
            report.discovered
        );
    }

    if report.failed() > 0 {
        return Err(Error::PartialSync {
            failed: report.failed(),
            total: report.discovered,
        }
        .into());
    }

    Ok(())
}
