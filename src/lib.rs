//! Wait a Moment - A countdown timer widget core served over HTTP
//! 
//! This library provides the countdown engine, the bell shake animator
//! state and the cooperative tasks that drive them, plus an HTTP surface
//! a front end can render from.

pub mod config;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
