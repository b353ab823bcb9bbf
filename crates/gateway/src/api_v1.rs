//! HTTP API v1: one endpoint per UI tab plus session and catalog lookups.
//!
//! Endpoints:
//!
//! - `GET    /v1/status`                  — Version, provider, model, live sessions
//! - `GET    /v1/catalog/paths`           — All learning paths
//! - `POST   /v1/sessions`                — Allocate a session id
//! - `GET    /v1/sessions/{id}`           — Session snapshot
//! - `DELETE /v1/sessions/{id}`           — Forget a session
//! - `POST   /v1/sessions/{id}/profile`   — Profile tab
//! - `POST   /v1/sessions/{id}/chat`      — Chat tab
//! - `GET    /v1/sessions/{id}/resources` — Resources tab
//! - `POST   /v1/sessions/{id}/quiz`      — Practice tab
//! - `POST   /v1/sessions/{id}/plan`      — Study Plan tab

use axum::{
    Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use tutorly_catalog::LearningPath;
use tutorly_core::error::{Error, SessionError};
use tutorly_core::profile::Profile;
use tutorly_core::session::{Session, SessionId};
use tutorly_tutor::Tutor;

// ── State ─────────────────────────────────────────────────────────────────

/// Shared state for the v1 API.
pub struct ApiV1State {
    pub tutor: Arc<Tutor>,
    pub start_time: chrono::DateTime<chrono::Utc>,
}

impl ApiV1State {
    pub fn new(tutor: Arc<Tutor>) -> Self {
        Self {
            tutor,
            start_time: chrono::Utc::now(),
        }
    }
}

pub type SharedApiState = Arc<ApiV1State>;

// ── Router ────────────────────────────────────────────────────────────────

/// Build the v1 API router. Nest this under "/v1" in the main router.
pub fn v1_router(state: SharedApiState) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route("/catalog/paths", get(list_paths_handler))
        .route("/sessions", post(create_session_handler))
        .route(
            "/sessions/{id}",
            get(get_session_handler).delete(delete_session_handler),
        )
        .route("/sessions/{id}/profile", post(profile_handler))
        .route("/sessions/{id}/chat", post(chat_handler))
        .route("/sessions/{id}/resources", get(resources_handler))
        .route("/sessions/{id}/quiz", post(quiz_handler))
        .route("/sessions/{id}/plan", post(plan_handler))
        .with_state(state)
}

// ── Request / Response types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
}

#[derive(Deserialize)]
struct QuizRequest {
    topic: String,
    #[serde(default)]
    difficulty: String,
}

#[derive(Deserialize)]
struct PlanRequest {
    topic: String,
    #[serde(default)]
    duration: String,
}

/// Every tab action answers with Markdown.
#[derive(Serialize, Deserialize)]
struct ReplyResponse {
    reply: String,
}

#[derive(Serialize, Deserialize)]
struct CreateSessionResponse {
    session_id: String,
}

#[derive(Serialize, Deserialize)]
struct SessionResponse {
    session_id: String,
    #[serde(flatten)]
    session: Session,
}

#[derive(Serialize, Deserialize)]
struct ClearSessionResponse {
    cleared: bool,
}

#[derive(Serialize, Deserialize)]
struct PathListResponse {
    paths: Vec<LearningPath>,
    count: usize,
}

#[derive(Serialize, Deserialize)]
struct StatusResponse {
    status: String,
    version: String,
    uptime_secs: u64,
    provider: String,
    model: String,
    sessions: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Map a tutor failure to a response. Provider failures are the upstream's
/// fault, so they surface as 502.
fn tutor_error(action: &str, err: Error) -> ApiError {
    let status = match &err {
        Error::Provider(_) => StatusCode::BAD_GATEWAY,
        Error::Session(SessionError::InvalidId(_)) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error!(action, error = %err, status = status.as_u16(), "Request failed");
    api_error(status, err.to_string())
}

/// Unwrap a JSON body, answering a malformed one in the `{"error": ...}` shape.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| api_error(rejection.status(), rejection.body_text()))
}

fn parse_id(id: &str) -> Result<SessionId, ApiError> {
    SessionId::parse(id).map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))
}

fn reply(result: tutorly_core::Result<String>, action: &str) -> Result<Json<ReplyResponse>, ApiError> {
    result
        .map(|reply| Json(ReplyResponse { reply }))
        .map_err(|e| tutor_error(action, e))
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn status_handler(State(state): State<SharedApiState>) -> Result<Json<StatusResponse>, ApiError> {
    let sessions = state
        .tutor
        .session_count()
        .await
        .map_err(|e| tutor_error("status", e))?;

    let uptime = chrono::Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds()
        .max(0) as u64;

    Ok(Json(StatusResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_secs: uptime,
        provider: state.tutor.provider_name().into(),
        model: state.tutor.settings().model.clone(),
        sessions,
    }))
}

async fn list_paths_handler(State(state): State<SharedApiState>) -> Json<PathListResponse> {
    let paths = state.tutor.catalog().paths().to_vec();
    let count = paths.len();
    Json(PathListResponse { paths, count })
}

async fn create_session_handler() -> (StatusCode, Json<CreateSessionResponse>) {
    let id = SessionId::new();
    info!(session = %id, "Session allocated");
    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id: id.to_string(),
        }),
    )
}

async fn get_session_handler(
    State(state): State<SharedApiState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let id = parse_id(&id)?;
    let session = state
        .tutor
        .session_summary(&id)
        .await
        .map_err(|e| tutor_error("session", e))?;

    // A record that was never saved has no creation time.
    if session.created_at.is_none() {
        return Err(api_error(StatusCode::NOT_FOUND, format!("Unknown session: {id}")));
    }

    Ok(Json(SessionResponse {
        session_id: id.to_string(),
        session,
    }))
}

async fn delete_session_handler(
    State(state): State<SharedApiState>,
    Path(id): Path<String>,
) -> Result<Json<ClearSessionResponse>, ApiError> {
    let id = parse_id(&id)?;
    let cleared = state
        .tutor
        .clear_session(&id)
        .await
        .map_err(|e| tutor_error("clear", e))?;
    Ok(Json(ClearSessionResponse { cleared }))
}

async fn profile_handler(
    State(state): State<SharedApiState>,
    Path(id): Path<String>,
    profile: Result<Json<Profile>, JsonRejection>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let id = parse_id(&id)?;
    let profile = json_body(profile)?;
    reply(state.tutor.save_profile(&id, profile).await, "profile")
}

async fn chat_handler(
    State(state): State<SharedApiState>,
    Path(id): Path<String>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let id = parse_id(&id)?;
    let payload = json_body(payload)?;
    info!(session = %id, message_len = payload.message.len(), "v1/chat request");
    reply(state.tutor.chatbot_interface(&id, &payload.message).await, "chat")
}

async fn resources_handler(
    State(state): State<SharedApiState>,
    Path(id): Path<String>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let id = parse_id(&id)?;
    reply(state.tutor.get_resources(&id).await, "resources")
}

async fn quiz_handler(
    State(state): State<SharedApiState>,
    Path(id): Path<String>,
    payload: Result<Json<QuizRequest>, JsonRejection>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let id = parse_id(&id)?;
    let payload = json_body(payload)?;
    info!(session = %id, topic = %payload.topic, "v1/quiz request");
    reply(
        state
            .tutor
            .generate_quiz(&id, &payload.topic, &payload.difficulty)
            .await,
        "quiz",
    )
}

async fn plan_handler(
    State(state): State<SharedApiState>,
    Path(id): Path<String>,
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let id = parse_id(&id)?;
    let payload = json_body(payload)?;
    info!(session = %id, topic = %payload.topic, "v1/plan request");
    reply(
        state
            .tutor
            .create_study_plan(&id, &payload.topic, &payload.duration)
            .await,
        "plan",
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────
