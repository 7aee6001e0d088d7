use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
#[cfg(windows)]
use tokio::signal::windows::{ctrl_break, ctrl_c};

/// Cancel `cancel` when the process is asked to stop.
///
/// The sync driver checks the token between events, so the event being
/// imported when the signal arrives is finished first.
pub async fn handle_signals(cancel: CancellationToken) {
    tokio::select! {
        received = wait_for_signal() => {
            if received {
                cancel.cancel();
            }
        }
        _ = cancel.cancelled() => {}
    }
}

/// Platform-specific signal handling implementation
#[cfg(unix)]
async fn wait_for_signal() -> bool {
    // Handle SIGTERM (sent by schedulers and container runtimes)
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            error!("Failed to create SIGTERM signal handler: {}", e);
            return false;
        }
    };
    // Handle SIGINT (Ctrl+C)
    let mut sigint = match signal(SignalKind::interrupt()) {
        Ok(sigint) => sigint,
        Err(e) => {
            error!("Failed to create SIGINT signal handler: {}", e);
            return false;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {
            info!("Received SIGTERM signal, stopping after the current event");
        }
        _ = sigint.recv() => {
            info!("Received SIGINT signal, stopping after the current event");
        }
    }
    true
}

/// Platform-specific signal handling implementation
#[cfg(windows)]
async fn wait_for_signal() -> bool {
    // Handle Ctrl+C
    let mut ctrlc = match ctrl_c() {
        Ok(ctrlc) => ctrlc,
        Err(e) => {
            error!("Failed to create Ctrl+C signal handler: {}", e);
            return false;
        }
    };
    // Handle Ctrl+Break
    let mut ctrlbreak = match ctrl_break() {
        Ok(ctrlbreak) => ctrlbreak,
        Err(e) => {
            error!("Failed to create Ctrl+Break signal handler: {}", e);
            return false;
        }
    };

    tokio::select! {
        _ = ctrlc.recv() => {
            info!("Received Ctrl+C signal, stopping after the current event");
        }
        _ = ctrlbreak.recv() => {
            info!("Received Ctrl+Break signal, stopping after the current event");
        }
    }
    true
}
