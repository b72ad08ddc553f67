//! Pomodoro Server - A state-managed HTTP server running a work/break timer
//! 
//! This is the main entry point for the pomodoro-server application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use pomodoro_server::{
    api::create_router,
    config::Config,
    settings::JsonFileStore,
    state::{AppState, TimerEngine},
    tasks::{announcer_task, ticker_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_server={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomodoro-server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}", config.host, config.port);

    // Load persisted durations and build the timer
    let store = JsonFileStore::new(&config.settings_file);
    info!("Settings file: {}", store.path().display());
    let engine = TimerEngine::new(Arc::new(store));
    let state = Arc::new(AppState::new(engine, config.port, config.host.clone()));

    // Background tasks: the tick driver and the phase announcer
    let ticker = tokio::spawn(ticker_task(Arc::downgrade(&state)));
    let announcer = tokio::spawn(announcer_task(state.subscribe_notifications()));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start          - Start or resume the timer");
    info!("  POST /pause          - Pause the timer");
    info!("  POST /reset          - Reset to a fresh work session");
    info!("  GET  /settings       - Current durations");
    info!("  PUT  /settings/work  - Set work duration {{\"minutes\": n}}");
    info!("  PUT  /settings/break - Set break duration {{\"minutes\": n}}");
    info!("  GET  /status         - Timer status");
    info!("  GET  /health         - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // No ticks may outlive the timer
    ticker.abort();
    announcer.abort();

    info!("Server shutdown complete");
    Ok(())
}
