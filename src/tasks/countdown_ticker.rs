//! Countdown ticker background task

use std::sync::Arc;
use tokio::{
    sync::broadcast::{error::RecvError, Receiver},
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info, warn};

use crate::state::{AppState, TickOutcome, WidgetEvent};

/// Background task that ticks the countdown while it is running
pub async fn countdown_ticker_task(state: Arc<AppState>) {
    info!("Starting countdown ticker task ({}ms interval)", state.tick_interval.as_millis());

    let mut events = state.event_tx.subscribe();

    loop {
        match events.recv().await {
            Ok(WidgetEvent::Started) => {
                run_countdown(&state, &mut events).await;
            }
            Ok(event) => {
                debug!("Ticker idle, ignoring {:?}", event);
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Ticker lagged behind by {} events", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Event channel closed, stopping countdown ticker");
                break;
            }
        }
    }
}

/// Drive ticks until the countdown expires or is reset
async fn run_countdown(state: &AppState, events: &mut Receiver<WidgetEvent>) {
    let period = state.tick_interval;
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    debug!("Countdown ticking");

    loop {
        // Pending events win so a queued reset is seen before a due tick
        tokio::select! {
            biased;

            event = events.recv() => {
                match event {
                    Ok(WidgetEvent::Reset) => {
                        debug!("Countdown reset, ticker stopped");
                        break;
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Ticker lagged behind by {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            _ = interval.tick() => {
                match state.tick() {
                    Ok(TickOutcome::Progressed) => {}
                    Ok(TickOutcome::Expired) => {
                        info!("Countdown expired, ticker stopped");
                        break;
                    }
                    Ok(TickOutcome::Ignored) => {
                        debug!("Countdown no longer running, ticker stopped");
                        break;
                    }
                    Err(e) => {
                        error!("Failed to tick countdown: {}", e);
                        break;
                    }
                }
            }
        }
    }
}
