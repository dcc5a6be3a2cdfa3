//! Wait a Moment - A countdown timer widget core served over HTTP
//!
//! This is the main entry point for the wait-a-moment application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use wait_a_moment::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::{bell_animator_task, countdown_ticker_task},
    utils::shutdown_signal,
};

// One mutator thread: ticks, shake steps and requests all run cooperatively.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("wait_a_moment={},tower_http=info", config.log_level()))
        .init();

    let duration = config.initial_duration();
    info!("Starting wait-a-moment v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, duration={}s, tick={}ms",
          config.host, config.port, duration.total_duration_seconds, config.tick_ms);

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        duration,
        config.tick_interval(),
        config.light,
    ));

    // Start the countdown ticker and bell animator
    tokio::spawn(countdown_ticker_task(Arc::clone(&state)));
    tokio::spawn(bell_animator_task(Arc::clone(&state)));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start         - Start the countdown");
    info!("  POST /reset         - Reset the countdown and bell");
    info!("  POST /duration      - Pick a duration {{minutes, seconds}}");
    info!("  POST /theme         - Set the theme {{light}}");
    info!("  POST /theme/toggle  - Flip the theme");
    info!("  POST /exit          - Shut down");
    info!("  GET  /status        - Current widget properties");
    info!("  GET  /health        - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal(Arc::clone(&state)) => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
