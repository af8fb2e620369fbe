// HTTP request handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use super::SupportServer;
use crate::engine::ChatPayload;
use crate::metrics::{MetricsLogger, TurnMetric};
use crate::report::{synthesize, ReportRenderer, RiskReport, TextRenderer};
use crate::screening::{Factor, FactorValue};
use crate::sentiment::SentimentLabel;

/// Create the main application router
pub fn create_router(server: Arc<SupportServer>) -> Router {
    Router::new()
        .route("/api/chat", post(handle_chat))
        .route("/api/report/:session_id", get(handle_report))
        .route("/api/stats/:session_id", get(handle_stats))
        .route("/api/factor", post(handle_factor))
        .route("/api/clear", post(handle_clear))
        .route("/health", get(health_check))
        .with_state(server)
}

/// Request body for /api/chat
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Session ID for conversation continuity
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response body for /api/chat: the engine payload plus session routing
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    #[serde(flatten)]
    pub payload: ChatPayload,
    pub session_id: String,
}

/// Handle POST /api/chat - main chat endpoint
async fn handle_chat(
    State(server): State<Arc<SupportServer>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::bad_request("No message provided"));
    }

    let start_time = Instant::now();

    let session_id = server
        .session_manager()
        .get_or_create(request.session_id.as_deref())?;

    // Mutate under the session guard so concurrent requests for the same
    // session cannot lose a turn.
    let response = server
        .session_manager()
        .with_session(&session_id, |session| {
            session.engine.get_response(&request.message)
        })
        .ok_or_else(|| AppError::bad_request("Session not found"))?;

    let metric = TurnMetric::new(
        MetricsLogger::hash_query(&request.message),
        response.kind().to_string(),
        response.sentiment_tag().to_string(),
        response.is_emergency(),
        start_time.elapsed().as_millis() as u64,
    );
    server.metrics_logger().log(&metric)?;

    Ok(Json(ChatResponse {
        payload: ChatPayload::from(&response),
        session_id,
    }))
}

/// Response body for /api/report/:session_id
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub report: RiskReport,
    /// Rendered plain-text document
    pub document: String,
}

/// Handle GET /api/report/:session_id - synthesize a risk report
async fn handle_report(
    State(server): State<Arc<SupportServer>>,
    Path(session_id): Path<String>,
) -> Result<Json<ReportResponse>, AppError> {
    let session = server
        .session_manager()
        .get(&session_id)
        .ok_or_else(|| AppError::bad_request("Session not found"))?;

    let engine = &session.engine;
    let report = synthesize(engine.profile(), engine.history(), engine.factors())
        .ok_or_else(|| AppError::bad_request("No conversation data available"))?;

    let document = TextRenderer::new().render(&report);
    Ok(Json(ReportResponse { report, document }))
}

/// Response body for /api/stats/:session_id
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_messages: usize,
    pub trauma_indicators: usize,
    pub crisis_indicators: usize,
    pub sentiment_breakdown: BTreeMap<String, usize>,
}

/// Handle GET /api/stats/:session_id - conversation statistics
async fn handle_stats(
    State(server): State<Arc<SupportServer>>,
    Path(session_id): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let session = server
        .session_manager()
        .get(&session_id)
        .ok_or_else(|| AppError::bad_request("Session not found"))?;

    let history = session.engine.history();
    let mut breakdown = BTreeMap::new();
    for turn in history.turns() {
        *breakdown.entry(turn.sentiment.as_str().to_string()).or_insert(0) += 1;
    }

    Ok(Json(StatsResponse {
        total_messages: history.len(),
        trauma_indicators: history.trauma_indicator_count(),
        crisis_indicators: history.count_sentiment(SentimentLabel::Crisis),
        sentiment_breakdown: breakdown,
    }))
}

/// Request body for /api/factor
#[derive(Debug, Deserialize)]
pub struct FactorRequest {
    pub session_id: String,
    pub factor: Factor,
    pub value: FactorValue,
}

/// Handle POST /api/factor - record a screening answer
async fn handle_factor(
    State(server): State<Arc<SupportServer>>,
    Json(request): Json<FactorRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    server
        .session_manager()
        .with_session(&request.session_id, |session| {
            session.engine.set_factor(request.factor, request.value)
        })
        .ok_or_else(|| AppError::bad_request("Session not found"))?;

    Ok(Json(serde_json::json!({ "message": "Factor recorded" })))
}

/// Request body for /api/clear
#[derive(Debug, Deserialize)]
pub struct ClearRequest {
    pub session_id: String,
}

/// Handle POST /api/clear - drop a session and its history
async fn handle_clear(
    State(server): State<Arc<SupportServer>>,
    Json(request): Json<ClearRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    server.session_manager().delete(&request.session_id);
    Ok(Json(serde_json::json!({
        "message": "Conversation cleared successfully"
    })))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub profile: String,
    pub active_sessions: usize,
}

/// Handle GET /health
pub async fn health_check(
    State(server): State<Arc<SupportServer>>,
) -> Result<Json<HealthStatus>, AppError> {
    Ok(Json(HealthStatus {
        status: "healthy".to_string(),
        profile: server.profile().to_string(),
        active_sessions: server.session_manager().active_count(),
    }))
}

/// Application error wrapper for proper HTTP error responses
pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: anyhow::anyhow!("{message}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.error, status = %self.status, "Request failed");

        let body = serde_json::json!({
            "error": {
                "message": self.error.to_string(),
                "type": "api_error"
            }
        });

        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: err.into(),
        }
    }
}
