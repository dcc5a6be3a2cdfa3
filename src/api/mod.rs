//! HTTP API module
//!
//! This module exposes the widget's controls and rendered properties over
//! HTTP for whatever front end draws the ring and the bell.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", post(start_handler))
        .route("/reset", post(reset_handler))
        .route("/duration", post(duration_handler))
        .route("/theme", post(theme_handler))
        .route("/theme/toggle", post(theme_toggle_handler))
        .route("/exit", post(exit_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
