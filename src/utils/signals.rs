//! Shutdown triggers: OS signals and the widget's exit control

use std::sync::Arc;
use signal_hook_tokio::Signals;
use futures::stream::StreamExt;
use tracing::{info, warn};

use crate::state::AppState;

/// Wait for SIGTERM/SIGINT or for the exit control to be used
pub async fn shutdown_signal(state: Arc<AppState>) {
    let signals = Signals::new([
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ]);

    let mut signals = match signals {
        Ok(signals) => signals,
        Err(e) => {
            warn!("Failed to install signal handler, only /exit will stop the server: {}", e);
            state.exit_requested.notified().await;
            return;
        }
    };

    tokio::select! {
        Some(signal) = signals.next() => {
            info!("Received signal: {}", signal);
        }
        _ = state.exit_requested.notified() => {
            info!("Exit control used");
        }
    }
}
