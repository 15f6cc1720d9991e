use super::state::AppState;
use crate::error::SessionError;
use crate::session::SessionStats;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct StartSessionRequest {
    /// Scenario to practice; `null` or missing is rejected
    #[serde(default)]
    pub scenario_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: Uuid,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StopSessionResponse {
    pub status: String,
    pub message: String,
    pub stats: SessionStats,
}

#[derive(Debug, Serialize)]
pub struct ScenarioSummary {
    pub id: String,
    pub program: String,
    pub title: String,
    pub narrative: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(error: &SessionError) -> Response {
    let status = match error {
        SessionError::MissingScenario => StatusCode::BAD_REQUEST,
        SessionError::UnknownScenario(_) => StatusCode::NOT_FOUND,
        SessionError::AlreadyActive | SessionError::NotConnected => StatusCode::CONFLICT,
        SessionError::PermissionDenied(_) => StatusCode::FORBIDDEN,
        SessionError::EngineStartFailure(_)
        | SessionError::EngineStopFailure(_)
        | SessionError::EngineError(_) => StatusCode::BAD_GATEWAY,
    };

    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /scenarios
pub async fn list_scenarios(State(state): State<AppState>) -> impl IntoResponse {
    let scenarios: Vec<ScenarioSummary> = state
        .controller
        .catalog()
        .list()
        .iter()
        .map(|s| ScenarioSummary {
            id: s.id.clone(),
            program: s.program.clone(),
            title: s.title.clone(),
            narrative: s.narrative.clone(),
        })
        .collect();

    Json(scenarios)
}

/// POST /session/start
/// Start a practice session
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> Response {
    info!("Start requested for scenario: {:?}", req.scenario_id);

    match state.controller.start(req.scenario_id.as_deref()).await {
        Ok(session_id) => (
            StatusCode::OK,
            Json(StartSessionResponse {
                session_id,
                status: state.controller.status().await.to_string(),
                message: format!("Session {} started", session_id),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to start session: {}", e);
            error_response(&e)
        }
    }
}

/// POST /session/stop
/// Stop the session; the audit runs before this returns
pub async fn stop_session(State(state): State<AppState>) -> Response {
    info!("Stop requested");

    match state.controller.stop().await {
        Ok(()) => (
            StatusCode::OK,
            Json(StopSessionResponse {
                status: state.controller.status().await.to_string(),
                message: "Session stopped".to_string(),
                stats: state.controller.stats().await,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to stop session: {}", e);
            error_response(&e)
        }
    }
}

/// GET /session/status
pub async fn get_session_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.controller.stats().await)
}

/// GET /session/transcript
/// Get transcript for the session (accumulated so far)
pub async fn get_session_transcript(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.controller.transcript().await)
}

/// GET /session/feedback
pub async fn get_session_feedback(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.controller.outcome())
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
