//! Countdown engine: duration, progress fraction and tick transitions

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Progress value for a full, untouched countdown
pub const FULL_PROGRESS: f64 = 100.0;

/// Reference tick interval of the periodic scheduler
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Duration the widget starts with (10:00)
pub const DEFAULT_DURATION_SECONDS: u64 = 600;

// Float noise from the progress division must not push the readout up a second.
const REMAINING_EPSILON: f64 = 1e-9;

/// Lifecycle of a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    Idle,
    Running,
    Expired,
}

impl CountdownState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CountdownState::Idle => "idle",
            CountdownState::Running => "running",
            CountdownState::Expired => "expired",
        }
    }
}

/// Configured countdown length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfiguration {
    pub total_duration_seconds: u64,
}

impl TimerConfiguration {
    pub fn new(total_duration_seconds: u64) -> Self {
        Self { total_duration_seconds }
    }

    /// Build a configuration from the duration picker's minutes and seconds
    pub fn from_picker(minutes: u64, seconds: u64) -> Self {
        Self::new(minutes.saturating_mul(60).saturating_add(seconds))
    }
}

impl Default for TimerConfiguration {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_SECONDS)
    }
}

/// Result of feeding one scheduler tick into the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The engine was not running; nothing changed
    Ignored,
    /// Progress went down by one step
    Progressed,
    /// The countdown just transitioned to `Expired`
    Expired,
}

/// The countdown state machine.
///
/// Time never enters the engine directly: an external scheduler calls
/// [`CountdownEngine::on_tick`] once per tick interval, and progress is
/// derived from the number of ticks seen since `start()`.
#[derive(Debug, Clone)]
pub struct CountdownEngine {
    config: TimerConfiguration,
    state: CountdownState,
    progress_fraction: f64,
    elapsed_ticks: u64,
    tick_interval: Duration,
}

impl CountdownEngine {
    pub fn new(config: TimerConfiguration, tick_interval: Duration) -> Self {
        Self {
            config,
            state: CountdownState::Idle,
            progress_fraction: FULL_PROGRESS,
            elapsed_ticks: 0,
            tick_interval,
        }
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    pub fn config(&self) -> TimerConfiguration {
        self.config
    }

    pub fn progress_fraction(&self) -> f64 {
        self.progress_fraction
    }

    /// Scheduler invocations per second at the configured interval
    pub fn ticks_per_second(&self) -> f64 {
        1000.0 / self.tick_interval.as_millis().max(1) as f64
    }

    /// Progress lost per tick, or `None` for a zero-length countdown
    pub fn step(&self) -> Option<f64> {
        let total_ticks = self.total_ticks();
        if total_ticks > 0.0 {
            Some(FULL_PROGRESS / total_ticks)
        } else {
            None
        }
    }

    fn total_ticks(&self) -> f64 {
        self.config.total_duration_seconds as f64 * self.ticks_per_second()
    }

    /// Set a new duration. Only accepted while idle; returns whether it was applied.
    pub fn configure(&mut self, total_duration_seconds: u64) -> bool {
        if self.state != CountdownState::Idle {
            debug!(
                "Ignoring duration change to {}s while countdown is {}",
                total_duration_seconds,
                self.state.as_str()
            );
            return false;
        }

        self.config = TimerConfiguration::new(total_duration_seconds);
        self.progress_fraction = FULL_PROGRESS;
        self.elapsed_ticks = 0;
        info!("Countdown configured for {}s", total_duration_seconds);
        true
    }

    /// Begin counting down. Only accepted from `Idle`.
    pub fn start(&mut self) -> bool {
        if self.state != CountdownState::Idle {
            return false;
        }

        self.state = CountdownState::Running;
        info!(
            "Countdown started: {}s at {}ms per tick",
            self.config.total_duration_seconds,
            self.tick_interval.as_millis()
        );
        true
    }

    /// Return to `Idle` with a full progress ring
    pub fn reset(&mut self) {
        if self.state != CountdownState::Idle {
            info!("Countdown reset from {}", self.state.as_str());
        }
        self.state = CountdownState::Idle;
        self.progress_fraction = FULL_PROGRESS;
        self.elapsed_ticks = 0;
    }

    /// Advance the countdown by one scheduler tick
    pub fn on_tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Ignored;
        }

        let Some(step) = self.step() else {
            info!("Zero-length countdown expired on first tick");
            return self.expire();
        };

        if self.progress_fraction > 0.0 {
            self.elapsed_ticks += 1;
            let next = FULL_PROGRESS - self.elapsed_ticks as f64 * step;
            self.progress_fraction = next.clamp(0.0, self.progress_fraction);
            debug!(
                "Tick {}: progress {:.3}",
                self.elapsed_ticks, self.progress_fraction
            );
            TickOutcome::Progressed
        } else {
            info!("Countdown expired after {} ticks", self.elapsed_ticks);
            self.expire()
        }
    }

    fn expire(&mut self) -> TickOutcome {
        self.state = CountdownState::Expired;
        self.progress_fraction = 0.0;
        TickOutcome::Expired
    }

    /// Whole seconds left on the readout, rounded up
    pub fn remaining_seconds(&self) -> u64 {
        remaining_seconds(self.progress_fraction, self.config.total_duration_seconds)
    }

    /// The centered `MM:SS` label
    pub fn display_text(&self) -> String {
        format_mm_ss(self.remaining_seconds())
    }
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new(TimerConfiguration::default(), DEFAULT_TICK_INTERVAL)
    }
}

/// `ceil(progress / 100 * total)`, never negative
pub fn remaining_seconds(progress_fraction: f64, total_duration_seconds: u64) -> u64 {
    let exact = progress_fraction / FULL_PROGRESS * total_duration_seconds as f64;
    (exact - REMAINING_EPSILON).ceil().max(0.0) as u64
}

/// Format seconds as zero-padded "MM:SS"
pub fn format_mm_ss(total_seconds: u64) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(seconds: u64) -> CountdownEngine {
        CountdownEngine::new(TimerConfiguration::new(seconds), DEFAULT_TICK_INTERVAL)
    }

    #[test]
    fn test_defaults() {
        let engine = CountdownEngine::default();
        assert_eq!(engine.state(), CountdownState::Idle);
        assert_eq!(engine.progress_fraction(), FULL_PROGRESS);
        assert_eq!(engine.display_text(), "10:00");
        assert_eq!(engine.ticks_per_second(), 10.0);
    }

    #[test]
    fn test_full_run_is_monotonic() {
        let mut engine = engine(3);
        assert!(engine.start());
        assert_eq!(engine.display_text(), "00:03");

        let mut last = engine.progress_fraction();
        let mut ticks = 0;
        while engine.on_tick() == TickOutcome::Progressed {
            assert!(engine.progress_fraction() <= last);
            last = engine.progress_fraction();
            ticks += 1;
        }

        assert_eq!(ticks, 30);
        assert_eq!(engine.state(), CountdownState::Expired);
        assert_eq!(engine.progress_fraction(), 0.0);
        assert_eq!(engine.display_text(), "00:00");
    }

    #[test]
    fn test_display_text_rounds_up() {
        let mut engine = engine(2);
        engine.start();
        engine.on_tick();
        assert_eq!(engine.progress_fraction(), 95.0);
        assert_eq!(engine.display_text(), "00:02");

        for _ in 0..9 {
            engine.on_tick();
        }
        assert_eq!(engine.progress_fraction(), 50.0);
        assert_eq!(engine.display_text(), "00:01");
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut engine = engine(10);
        assert!(engine.start());
        engine.on_tick();
        let progress = engine.progress_fraction();

        assert!(!engine.start());
        assert_eq!(engine.state(), CountdownState::Running);
        assert_eq!(engine.progress_fraction(), progress);
    }

    #[test]
    fn test_configure_while_idle_and_running() {
        let mut engine = engine(600);
        assert!(engine.configure(300));
        assert_eq!(engine.display_text(), "05:00");
        assert_eq!(engine.state(), CountdownState::Idle);

        engine.start();
        engine.on_tick();
        let progress = engine.progress_fraction();
        assert!(!engine.configure(10));
        assert_eq!(engine.config().total_duration_seconds, 300);
        assert_eq!(engine.progress_fraction(), progress);
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut engine = engine(1);
        engine.start();
        while engine.on_tick() != TickOutcome::Expired {}
        assert_eq!(engine.state(), CountdownState::Expired);

        engine.reset();
        assert_eq!(engine.state(), CountdownState::Idle);
        assert_eq!(engine.progress_fraction(), FULL_PROGRESS);
        assert_eq!(engine.display_text(), "00:01");
        assert_eq!(engine.on_tick(), TickOutcome::Ignored);
    }

    #[test]
    fn test_one_second_expires_on_eleventh_tick() {
        let mut engine = engine(1);
        engine.start();
        for _ in 0..10 {
            assert_eq!(engine.on_tick(), TickOutcome::Progressed);
        }
        assert_eq!(engine.progress_fraction(), 0.0);
        assert_eq!(engine.state(), CountdownState::Running);
        assert_eq!(engine.on_tick(), TickOutcome::Expired);
        assert_eq!(engine.on_tick(), TickOutcome::Ignored);
    }

    #[test]
    fn test_zero_duration_expires_without_fault() {
        let mut engine = engine(0);
        assert_eq!(engine.step(), None);
        assert_eq!(engine.display_text(), "00:00");
        engine.start();
        assert_eq!(engine.on_tick(), TickOutcome::Expired);
        assert_eq!(engine.state(), CountdownState::Expired);
    }

    #[test]
    fn test_expired_cannot_restart_without_reset() {
        let mut engine = engine(0);
        engine.start();
        engine.on_tick();
        assert!(!engine.start());
        assert_eq!(engine.state(), CountdownState::Expired);
    }

    #[test]
    fn test_configure_rejected_after_expiry() {
        let mut engine = engine(0);
        engine.start();
        engine.on_tick();

        assert!(!engine.configure(300));
        assert_eq!(engine.state(), CountdownState::Expired);
        assert_eq!(engine.config().total_duration_seconds, 0);
        assert_eq!(engine.progress_fraction(), 0.0);
        assert_eq!(engine.display_text(), "00:00");

        engine.reset();
        assert!(engine.configure(300));
        assert_eq!(engine.display_text(), "05:00");
    }

    #[test]
    fn test_picker_mapping_and_format() {
        assert_eq!(TimerConfiguration::from_picker(10, 0).total_duration_seconds, 600);
        assert_eq!(TimerConfiguration::from_picker(1, 30).total_duration_seconds, 90);
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(59), "00:59");
        assert_eq!(format_mm_ss(6000), "100:00");
    }
}
