//! Bell shake animator background task

use std::sync::Arc;
use tokio::{sync::broadcast::error::RecvError, time::sleep};
use tracing::{debug, error, info, warn};

use crate::state::{AppState, WidgetEvent};

/// Background task that plays the bell shake after each expiry
pub async fn bell_animator_task(state: Arc<AppState>) {
    info!("Starting bell animator task");

    let mut events = state.event_tx.subscribe();

    loop {
        match events.recv().await {
            Ok(WidgetEvent::Expired { shake_id }) => {
                play_shake(&state, shake_id).await;
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!("Animator lagged behind by {} events", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Event channel closed, stopping bell animator");
                break;
            }
        }
    }
}

/// Step through the keyframes of one shake, holding each before the next
async fn play_shake(state: &AppState, shake_id: u64) {
    info!("Playing bell shake {}", shake_id);
    let mut steps = 0usize;

    loop {
        match state.advance_shake(shake_id) {
            Ok(Some(hold)) => {
                steps += 1;
                sleep(hold).await;
            }
            Ok(None) => break,
            Err(e) => {
                error!("Failed to advance bell shake: {}", e);
                break;
            }
        }
    }

    debug!("Bell shake {} stopped after {} keyframes", shake_id, steps);
}
