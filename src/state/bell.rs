//! Bell visual state and the expiry shake keyframes

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Number of times the three-phase sweep repeats
pub const SHAKE_REPETITIONS: usize = 6;

/// Linear interpolation steps per phase (samples = steps + 1)
pub const STEPS_PER_PHASE: u32 = 5;

/// Bell tint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    #[default]
    Neutral,
    Alert,
}

impl ColorToken {
    /// Render color for the token
    pub fn color(&self) -> &'static str {
        match self {
            ColorToken::Neutral => "DarkGray",
            ColorToken::Alert => "#F06292",
        }
    }
}

/// Bell icon transform and tint
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BellVisualState {
    pub rotation_degrees: f64,
    pub color_token: ColorToken,
}

/// One linear rotation sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakePhase {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
}

impl ShakePhase {
    pub const fn new(from: f64, to: f64, duration_ms: u64) -> Self {
        Self {
            from,
            to,
            duration: Duration::from_millis(duration_ms),
        }
    }

    /// Sample the sweep into `STEPS_PER_PHASE + 1` keyframes, endpoints included
    pub fn keyframes(self) -> impl Iterator<Item = Keyframe> {
        let increment = (self.to - self.from) / STEPS_PER_PHASE as f64;
        let hold = self.duration / STEPS_PER_PHASE;
        (0..=STEPS_PER_PHASE).map(move |i| Keyframe {
            rotation_degrees: self.from + increment * i as f64,
            hold,
        })
    }
}

/// One sweep of the shake: tilt left, swing right, settle
pub const SHAKE_PHASES: [ShakePhase; 3] = [
    ShakePhase::new(0.0, -15.0, 125),
    ShakePhase::new(-15.0, 15.0, 250),
    ShakePhase::new(15.0, 0.0, 125),
];

/// A sampled rotation held for a fixed time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub rotation_degrees: f64,
    pub hold: Duration,
}

/// The full expiry shake as a keyframe list plus a cursor.
///
/// Each sequence carries the id it was started with so a driver can tell
/// whether the sequence it is stepping is still the current one.
#[derive(Debug, Clone)]
pub struct ShakeSequence {
    id: u64,
    keyframes: Vec<Keyframe>,
    cursor: usize,
}

impl ShakeSequence {
    pub fn new(id: u64) -> Self {
        let keyframes = (0..SHAKE_REPETITIONS)
            .flat_map(|_| SHAKE_PHASES)
            .flat_map(|phase| phase.keyframes())
            .collect();

        Self {
            id,
            keyframes,
            cursor: 0,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.keyframes.len()
    }

    /// Take the next keyframe and move the cursor past it
    pub fn advance(&mut self) -> Option<Keyframe> {
        let keyframe = self.keyframes.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(keyframe)
    }

    /// Total time the sequence holds its keyframes
    pub fn total_duration(&self) -> Duration {
        self.keyframes.iter().map(|k| k.hold).sum()
    }
}
