use seminar_sync::{shutdown, startup};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting seminar sync");

    // Load configuration
    let config = startup::load_config()?;

    // Stop between events on SIGINT/SIGTERM
    let cancel = CancellationToken::new();
    tokio::spawn(shutdown::handle_signals(cancel.clone()));

    // Run the sync
    startup::run_sync(config, cancel).await
}
