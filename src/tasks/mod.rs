//! Background tasks module
//! 
//! This module contains the cooperative tasks that drive the countdown
//! ticks and the bell shake alongside the HTTP server.

pub mod countdown_ticker;
pub mod bell_animator;

// Re-export main functions
pub use countdown_ticker::countdown_ticker_task;
pub use bell_animator::bell_animator_task;
