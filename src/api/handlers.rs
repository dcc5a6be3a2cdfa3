//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::state::AppState;
use super::responses::{ApiResponse, DurationRequest, HealthResponse, StatusResponse, ThemeRequest};

/// Handle POST /start - Start the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.start() {
        Ok(widget) => {
            info!("Start endpoint called - countdown {}", widget.state.as_str());
            Ok(Json(ApiResponse::new(
                format!("Countdown {} at {}", widget.state.as_str(), widget.display_text),
                widget,
            )))
        }
        Err(e) => {
            error!("Failed to start countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - Reset the countdown and the bell
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.reset() {
        Ok(widget) => {
            info!("Reset endpoint called - countdown idle");
            Ok(Json(ApiResponse::new("Countdown reset".to_string(), widget)))
        }
        Err(e) => {
            error!("Failed to reset countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /duration - Apply a duration picked as minutes and seconds
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    if request.seconds > 59 {
        warn!("Rejecting duration with {} seconds", request.seconds);
        return Err(StatusCode::BAD_REQUEST);
    }

    match state.select_duration(request.minutes, request.seconds) {
        Ok((true, widget)) => {
            info!("Duration endpoint called - countdown set to {}", widget.display_text);
            Ok(Json(ApiResponse::new(
                format!("Duration set to {}", widget.display_text),
                widget,
            )))
        }
        Ok((false, widget)) => Ok(Json(ApiResponse::new(
            format!("Duration unchanged while countdown is {}", widget.state.as_str()),
            widget,
        ))),
        Err(e) => {
            error!("Failed to set duration: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /theme - Set the light/dark theme flag
pub async fn theme_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ThemeRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.set_light_theme(request.light) {
        Ok(widget) => Ok(Json(ApiResponse::new(theme_message(widget.light_theme), widget))),
        Err(e) => {
            error!("Failed to set theme: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /theme/toggle - Flip the theme flag
pub async fn theme_toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.toggle_theme() {
        Ok(widget) => Ok(Json(ApiResponse::new(theme_message(widget.light_theme), widget))),
        Err(e) => {
            error!("Failed to toggle theme: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn theme_message(light: bool) -> String {
    if light { "Light theme".to_string() } else { "Dark theme".to_string() }
}

/// Handle POST /exit - Close the widget
pub async fn exit_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    state.request_exit();
    StatusCode::ACCEPTED
}

/// Handle GET /status - Return every rendered property
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let widget = match state.get_snapshot() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get widget snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        widget,
        tick_interval_ms: state.tick_interval.as_millis() as u64,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
