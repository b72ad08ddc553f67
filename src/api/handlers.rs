//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    settings::Settings,
    state::{AppState, Phase, StateError},
    utils::format_uptime,
};
use super::responses::{ApiResponse, DurationRequest, ErrorResponse, HealthResponse, StatusResponse};

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn into_handler_error(context: &str, e: StateError) -> HandlerError {
    match e {
        StateError::Validation(e) => {
            warn!("{} rejected: {}", context, e);
            (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorResponse::new(e.to_string())))
        }
        e => {
            error!("{} failed: {}", context, e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(e.to_string())))
        }
    }
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, HandlerError> {
    let timer = state.start().map_err(|e| into_handler_error("Start", e))?;
    info!("Start endpoint called - timer running with {} remaining", timer.clock);
    Ok(Json(ApiResponse::new("Timer started".to_string(), timer)))
}

/// Handle POST /pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, HandlerError> {
    let timer = state.pause().map_err(|e| into_handler_error("Pause", e))?;
    info!("Pause endpoint called - timer paused at {}", timer.clock);
    Ok(Json(ApiResponse::new("Timer paused".to_string(), timer)))
}

/// Handle POST /reset - Back to a fresh work session
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, HandlerError> {
    let timer = state.reset().map_err(|e| into_handler_error("Reset", e))?;
    info!("Reset endpoint called");
    Ok(Json(ApiResponse::new("Timer reset".to_string(), timer)))
}

/// Handle PUT /settings/work - Change the work duration
pub async fn work_duration_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<ApiResponse>, HandlerError> {
    let timer = state
        .set_duration(Phase::Work, &request.minutes)
        .map_err(|e| into_handler_error("Work duration edit", e))?;
    Ok(Json(ApiResponse::new(
        format!("Work duration set to {} minutes", timer.work_duration_minutes),
        timer,
    )))
}

/// Handle PUT /settings/break - Change the break duration
pub async fn break_duration_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<ApiResponse>, HandlerError> {
    let timer = state
        .set_duration(Phase::Break, &request.minutes)
        .map_err(|e| into_handler_error("Break duration edit", e))?;
    Ok(Json(ApiResponse::new(
        format!("Break duration set to {} minutes", timer.break_duration_minutes),
        timer,
    )))
}

/// Handle GET /settings - Return the configured durations
pub async fn settings_handler(State(state): State<Arc<AppState>>) -> Result<Json<Settings>, HandlerError> {
    state
        .settings()
        .map(Json)
        .map_err(|e| into_handler_error("Settings read", e))
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, HandlerError> {
    let timer = state.snapshot().map_err(|e| into_handler_error("Status", e))?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        last_notification: state.last_notification(),
        uptime: format_uptime(state.uptime_seconds()),
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
