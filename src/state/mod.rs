//! State management module
//! 
//! This module contains the countdown engine, the bell animator state,
//! the widget that composes them and the shared application state.

pub mod countdown;
pub mod bell;
pub mod widget;
pub mod app_state;

// Re-export main types
pub use countdown::{CountdownEngine, CountdownState, TickOutcome, TimerConfiguration};
pub use bell::{BellVisualState, ColorToken, ShakeSequence};
pub use widget::{ControlFlags, Widget, WidgetSnapshot};
pub use app_state::{AppState, WidgetEvent};
