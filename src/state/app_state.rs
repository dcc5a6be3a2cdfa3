//! Shared application state: the widget behind a lock plus change notification

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch, Notify};
use tracing::{info, warn};

use super::{
    countdown::{TickOutcome, TimerConfiguration},
    widget::{Widget, WidgetSnapshot},
};

/// Lifecycle events consumed by the background tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEvent {
    Started,
    Reset,
    Expired { shake_id: u64 },
}

/// Main application state that owns the widget and its observers
#[derive(Debug)]
pub struct AppState {
    /// The countdown widget core
    pub widget: Arc<Mutex<Widget>>,
    /// Scheduler tick interval, fixed at construction
    pub tick_interval: Duration,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last user action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Lifecycle events for the ticker and animator tasks
    pub event_tx: broadcast::Sender<WidgetEvent>,
    /// Latest snapshot of every rendered property
    pub snapshot_tx: watch::Sender<WidgetSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<WidgetSnapshot>,
    /// Signalled when the exit control is used
    pub exit_requested: Notify,
}

impl AppState {
    /// Create a new AppState around an idle widget
    pub fn new(
        port: u16,
        host: String,
        config: TimerConfiguration,
        tick_interval: Duration,
        light_theme: bool,
    ) -> Self {
        let widget = Widget::new(config, tick_interval, light_theme);
        let (event_tx, _) = broadcast::channel(100);
        let (snapshot_tx, snapshot_rx) = watch::channel(widget.snapshot());

        Self {
            widget: Arc::new(Mutex::new(widget)),
            tick_interval,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            event_tx,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
            exit_requested: Notify::new(),
        }
    }

    /// Apply a mutation to the widget and publish the resulting snapshot
    fn update_widget<F, R>(
        &self,
        action: Option<&str>,
        updater: F,
    ) -> Result<(R, WidgetSnapshot), String>
    where
        F: FnOnce(&mut Widget) -> R,
    {
        let mut widget = self.widget.lock()
            .map_err(|e| format!("Failed to lock widget: {}", e))?;

        let result = updater(&mut *widget);
        let snapshot = widget.snapshot();
        drop(widget); // Release the lock early

        if let Some(action) = action {
            if let Ok(mut last_action) = self.last_action.lock() {
                *last_action = Some(action.to_string());
            }
            if let Ok(mut last_time) = self.last_action_time.lock() {
                *last_time = Some(Utc::now());
            }
        }

        // Notify renderers; send_replace never fails even without receivers
        self.snapshot_tx.send_replace(snapshot.clone());

        Ok((result, snapshot))
    }

    fn notify(&self, event: WidgetEvent) {
        if let Err(e) = self.event_tx.send(event) {
            warn!("Failed to send widget event {:?}: {}", event, e);
        }
    }

    /// Handle the start control
    pub fn start(&self) -> Result<WidgetSnapshot, String> {
        let (started, snapshot) = self.update_widget(Some("start"), Widget::start)?;
        if started {
            self.notify(WidgetEvent::Started);
        } else {
            info!("Start requested while {}, ignoring", snapshot.state.as_str());
        }
        Ok(snapshot)
    }

    /// Handle the reset control
    pub fn reset(&self) -> Result<WidgetSnapshot, String> {
        let (_, snapshot) = self.update_widget(Some("reset"), Widget::reset)?;
        self.notify(WidgetEvent::Reset);
        Ok(snapshot)
    }

    /// Handle a duration picked as minutes and seconds
    pub fn select_duration(
        &self,
        minutes: u64,
        seconds: u64,
    ) -> Result<(bool, WidgetSnapshot), String> {
        let total = TimerConfiguration::from_picker(minutes, seconds).total_duration_seconds;
        self.update_widget(Some("duration"), |widget| widget.select_duration(total))
    }

    /// Set the light/dark theme flag
    pub fn set_light_theme(&self, light: bool) -> Result<WidgetSnapshot, String> {
        info!("Setting light theme to: {}", light);
        self.update_widget(Some("theme"), |widget| widget.set_light_theme(light))
            .map(|(_, snapshot)| snapshot)
    }

    /// Flip the theme flag
    pub fn toggle_theme(&self) -> Result<WidgetSnapshot, String> {
        self.update_widget(Some("theme"), |widget| {
            let light = !widget.light_theme();
            widget.set_light_theme(light);
        })
        .map(|(_, snapshot)| snapshot)
    }

    /// Feed one scheduler tick into the countdown
    pub fn tick(&self) -> Result<TickOutcome, String> {
        let ((outcome, shake_id), _) = self.update_widget(None, Widget::tick)?;
        if let Some(shake_id) = shake_id {
            self.notify(WidgetEvent::Expired { shake_id });
        }
        Ok(outcome)
    }

    /// Step the bell shake; `None` means the animator should stop
    pub fn advance_shake(&self, shake_id: u64) -> Result<Option<Duration>, String> {
        self.update_widget(None, |widget| widget.advance_shake(shake_id))
            .map(|(hold, _)| hold)
    }

    /// Get the current snapshot
    pub fn get_snapshot(&self) -> Result<WidgetSnapshot, String> {
        self.widget.lock()
            .map(|widget| widget.snapshot())
            .map_err(|e| format!("Failed to lock widget: {}", e))
    }

    /// Subscribe to snapshot changes
    pub fn subscribe_snapshots(&self) -> watch::Receiver<WidgetSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Ask the server to shut down
    pub fn request_exit(&self) {
        info!("Exit requested");
        self.exit_requested.notify_one();
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{bell::ColorToken, countdown::CountdownState};

    fn app_state(seconds: u64) -> AppState {
        AppState::new(
            0,
            "127.0.0.1".to_string(),
            TimerConfiguration::new(seconds),
            Duration::from_millis(100),
            false,
        )
    }

    #[test]
    fn test_start_emits_event_once() {
        let state = app_state(10);
        let mut events = state.event_tx.subscribe();

        state.start().unwrap();
        state.start().unwrap();

        assert_eq!(events.try_recv().unwrap(), WidgetEvent::Started);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_expiry_emits_shake_id() {
        let state = app_state(0);
        let mut events = state.event_tx.subscribe();

        state.start().unwrap();
        assert_eq!(state.tick().unwrap(), TickOutcome::Expired);

        assert_eq!(events.try_recv().unwrap(), WidgetEvent::Started);
        assert_eq!(events.try_recv().unwrap(), WidgetEvent::Expired { shake_id: 1 });

        let snapshot = state.get_snapshot().unwrap();
        assert_eq!(snapshot.state, CountdownState::Expired);
        assert_eq!(snapshot.color_token, ColorToken::Alert);
    }

    #[test]
    fn test_snapshot_published_on_change() {
        let state = app_state(600);
        let mut snapshots = state.subscribe_snapshots();

        let (applied, _) = state.select_duration(5, 0).unwrap();
        assert!(applied);
        assert!(snapshots.has_changed().unwrap());
        assert_eq!(snapshots.borrow_and_update().display_text, "05:00");
    }

    #[test]
    fn test_last_action_tracking() {
        let state = app_state(600);
        assert_eq!(state.get_last_action(), (None, None));

        state.toggle_theme().unwrap();
        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("theme"));
        assert!(time.is_some());
        assert!(state.get_snapshot().unwrap().light_theme);

        // Ticks are not user actions
        state.start().unwrap();
        state.tick().unwrap();
        assert_eq!(state.get_last_action().0.as_deref(), Some("start"));
    }
}
