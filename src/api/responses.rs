//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::WidgetSnapshot;

/// API response structure for control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub widget: WidgetSnapshot,
}

impl ApiResponse {
    /// Create a new API response; status mirrors the countdown state
    pub fn new(message: String, widget: WidgetSnapshot) -> Self {
        Self {
            status: widget.state.as_str().to_string(),
            message,
            timestamp: Utc::now(),
            widget,
        }
    }
}

/// Duration picker selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationRequest {
    pub minutes: u64,
    pub seconds: u64,
}

/// Theme selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeRequest {
    pub light: bool,
}

/// Status response with the full widget snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub widget: WidgetSnapshot,
    pub tick_interval_ms: u64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
