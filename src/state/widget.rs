//! Widget composition: countdown engine, bell animator state and theme

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    bell::{BellVisualState, ColorToken, ShakeSequence},
    countdown::{CountdownEngine, CountdownState, TickOutcome, TimerConfiguration},
};

/// Enablement of the start button, reset button and duration picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlFlags {
    pub start_enabled: bool,
    pub reset_enabled: bool,
    pub duration_picker_enabled: bool,
}

impl ControlFlags {
    pub fn for_state(state: CountdownState) -> Self {
        let idle = state == CountdownState::Idle;
        Self {
            start_enabled: idle,
            reset_enabled: !idle,
            duration_picker_enabled: idle,
        }
    }
}

/// Everything a renderer needs, captured after a mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSnapshot {
    pub state: CountdownState,
    pub total_duration_seconds: u64,
    pub progress_fraction: f64,
    pub display_text: String,
    pub rotation_degrees: f64,
    pub color_token: ColorToken,
    pub bell_color: String,
    #[serde(flatten)]
    pub controls: ControlFlags,
    pub light_theme: bool,
}

/// The countdown widget core.
///
/// Owns the engine and the bell, and decides what the expiry animator
/// does. All methods are synchronous; timing lives in the tasks that call
/// [`Widget::tick`] and [`Widget::advance_shake`].
#[derive(Debug, Clone)]
pub struct Widget {
    engine: CountdownEngine,
    bell: BellVisualState,
    shake: Option<ShakeSequence>,
    next_shake_id: u64,
    light_theme: bool,
}

impl Widget {
    pub fn new(config: TimerConfiguration, tick_interval: Duration, light_theme: bool) -> Self {
        Self {
            engine: CountdownEngine::new(config, tick_interval),
            bell: BellVisualState::default(),
            shake: None,
            next_shake_id: 1,
            light_theme,
        }
    }

    pub fn engine(&self) -> &CountdownEngine {
        &self.engine
    }

    pub fn bell(&self) -> BellVisualState {
        self.bell
    }

    pub fn controls(&self) -> ControlFlags {
        ControlFlags::for_state(self.engine.state())
    }

    pub fn light_theme(&self) -> bool {
        self.light_theme
    }

    /// Id of the shake sequence in flight, if any
    pub fn active_shake(&self) -> Option<u64> {
        self.shake.as_ref().map(ShakeSequence::id)
    }

    pub fn start(&mut self) -> bool {
        self.engine.start()
    }

    /// Back to idle; also drops any shake still in flight
    pub fn reset(&mut self) {
        self.engine.reset();
        self.bell = BellVisualState::default();
        if let Some(shake) = self.shake.take() {
            info!("Cancelled bell shake {}", shake.id());
        }
    }

    pub fn select_duration(&mut self, total_duration_seconds: u64) -> bool {
        self.engine.configure(total_duration_seconds)
    }

    pub fn set_light_theme(&mut self, light: bool) {
        self.light_theme = light;
    }

    /// Feed one tick; on expiry, tint the bell and arm a new shake
    pub fn tick(&mut self) -> (TickOutcome, Option<u64>) {
        let outcome = self.engine.on_tick();
        if outcome != TickOutcome::Expired {
            return (outcome, None);
        }

        let id = self.next_shake_id;
        self.next_shake_id += 1;
        self.bell.color_token = ColorToken::Alert;
        self.shake = Some(ShakeSequence::new(id));
        info!("Bell alert raised, shake {} armed", id);
        (outcome, Some(id))
    }

    /// Apply the next keyframe of shake `id` and return how long to hold it.
    ///
    /// Returns `None` once the sequence is done or when `id` is no longer
    /// the current sequence.
    pub fn advance_shake(&mut self, id: u64) -> Option<Duration> {
        let shake = self.shake.as_mut().filter(|s| s.id() == id)?;

        match shake.advance() {
            Some(keyframe) => {
                self.bell.rotation_degrees = keyframe.rotation_degrees;
                debug!(
                    "Shake {}: rotation {:.1} for {}ms",
                    id,
                    keyframe.rotation_degrees,
                    keyframe.hold.as_millis()
                );
                Some(keyframe.hold)
            }
            None => {
                self.shake = None;
                debug!("Shake {} finished", id);
                None
            }
        }
    }

    pub fn snapshot(&self) -> WidgetSnapshot {
        WidgetSnapshot {
            state: self.engine.state(),
            total_duration_seconds: self.engine.config().total_duration_seconds,
            progress_fraction: self.engine.progress_fraction(),
            display_text: self.engine.display_text(),
            rotation_degrees: self.bell.rotation_degrees,
            color_token: self.bell.color_token,
            bell_color: self.bell.color_token.color().to_string(),
            controls: self.controls(),
            light_theme: self.light_theme,
        }
    }
}

impl Default for Widget {
    fn default() -> Self {
        Self::new(
            TimerConfiguration::default(),
            super::countdown::DEFAULT_TICK_INTERVAL,
            false,
        )
    }
}
