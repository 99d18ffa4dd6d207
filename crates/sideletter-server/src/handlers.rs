//! HTTP request handlers for the Side Letter API.
//!
//! Exposes the chat pipeline, the interaction log, and health endpoints
//! using axum.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sideletter_domain::{InteractionId, InteractionRecord, QueryResult};
use sideletter_log::{
    ExportFormat, InteractionLog, LogError, DEFAULT_PAGE_LIMIT, MAX_EXPORT_LIMIT,
};
use sideletter_orchestrator::{OrchestrationError, QueryOrchestrator};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Query pipeline, which also owns the interaction log
    pub orchestrator: Arc<QueryOrchestrator>,
}

impl AppState {
    /// Wrap an orchestrator for sharing across handlers
    pub fn new(orchestrator: QueryOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    fn log(&self) -> &InteractionLog {
        self.orchestrator.log()
    }
}

/// Chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Natural-language question
    #[serde(default)]
    pub question: String,
}

/// Chat response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Pipeline result
    #[serde(flatten)]
    pub result: QueryResult,
    /// Always true on this path
    pub success: bool,
}

/// One page of the interaction log
#[derive(Debug, Serialize)]
pub struct LogsResponse {
    /// Records, most recent first
    pub logs: Vec<InteractionRecord>,
    /// Records currently retained
    pub total: usize,
    /// Effective page size
    pub limit: usize,
    /// Requested offset
    pub offset: usize,
}

/// Paging parameters for `GET /api/logs`
#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
    /// Page size (default 50, clamped to 200)
    pub limit: Option<String>,
    /// Records to skip from the newest
    pub offset: Option<String>,
}

/// Parameters for `GET /api/logs/export`
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    /// `json`, `csv` or `txt`; anything else falls back to JSON
    pub format: Option<String>,
    /// Maximum records (default and cap 1000)
    pub limit: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Whether the retrieval backend has credentials
    pub ragie_connected: bool,
    /// Whether the generation backend has credentials
    pub openai_connected: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Machine-readable category
    pub kind: String,
    /// Always false
    pub success: bool,
}

/// Application error type
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request outside the pipeline's own validation
    BadRequest(String),
    /// Path names nothing that could exist
    NotFound(String),
    /// Pipeline failure
    Orchestration(OrchestrationError),
    /// Log lookup or export failure
    Log(LogError),
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Orchestration(e) => {
                let status = match e {
                    OrchestrationError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                    OrchestrationError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    OrchestrationError::BackendUnavailable(_)
                    | OrchestrationError::GenerationEmpty(_) => StatusCode::BAD_GATEWAY,
                };
                (status, e.kind())
            }
            ApiError::Log(e) => {
                let status = match e {
                    LogError::NotFound(_) => StatusCode::NOT_FOUND,
                    LogError::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
                    LogError::ZeroCapacity | LogError::Serialization(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, e.kind())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        let message = match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => msg,
            ApiError::Orchestration(e) => e.to_string(),
            ApiError::Log(LogError::NotFound(_)) => "Log not found".to_string(),
            ApiError::Log(e) => e.to_string(),
        };

        if status.is_server_error() {
            error!("Request failed ({}): {}", kind, message);
        } else {
            warn!("Rejected request ({}): {}", kind, message);
        }

        let body = Json(ErrorResponse {
            error: message,
            kind: kind.to_string(),
            success: false,
        });
        (status, body).into_response()
    }
}

impl From<OrchestrationError> for ApiError {
    fn from(e: OrchestrationError) -> Self {
        ApiError::Orchestration(e)
    }
}

impl From<LogError> for ApiError {
    fn from(e: LogError) -> Self {
        ApiError::Log(e)
    }
}

/// Parse an optional non-negative integer query parameter
fn parse_count(name: &str, value: Option<&str>, default: usize) -> Result<usize, ApiError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            ApiError::BadRequest(format!("{} must be a non-negative integer", name))
        }),
    }
}

/// Service banner
async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Side Letter Research Partner API",
        "status": "running",
        "endpoints": {
            "chat": "POST /api/chat",
            "logs": "GET /api/logs",
            "log": "GET /api/logs/{id}",
            "export": "GET /api/logs/export?format=json|csv|txt",
            "documents": "GET /api/documents",
            "health": "GET /health"
        }
    }))
}

/// Health check endpoint
///
/// Returns which backends have credentials. Never calls them.
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        ragie_connected: state.orchestrator.retrieval_configured(),
        openai_connected: state.orchestrator.generation_configured(),
    })
}

/// Answer a question
async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Json<ChatResponse>, ApiError> {
    let request: ChatRequest = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest("Request body is required".to_string()))?;

    let result = state.orchestrator.orchestrate(&request.question).await?;

    Ok(Json(ChatResponse {
        result,
        success: true,
    }))
}

/// List interactions, most recent first
async fn list_logs(
    State(state): State<AppState>,
    Query(params): Query<LogsQuery>,
) -> Result<Json<LogsResponse>, ApiError> {
    let limit = parse_count("limit", params.limit.as_deref(), DEFAULT_PAGE_LIMIT)?;
    let offset = parse_count("offset", params.offset.as_deref(), 0)?;

    let page = state.log().list(limit, offset);

    Ok(Json(LogsResponse {
        logs: page.records,
        total: page.total,
        limit: page.limit,
        offset: page.offset,
    }))
}

/// Fetch one interaction by id
///
/// Ids that are not non-negative integers can never have been issued, so
/// they are reported the same way as evicted ones.
async fn get_log(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<InteractionRecord>, ApiError> {
    let id: InteractionId = raw_id
        .parse()
        .map_err(|_| ApiError::NotFound("Log not found".to_string()))?;
    Ok(Json(state.log().get(id)?))
}

/// Download the log as a file
async fn export_logs(
    State(state): State<AppState>,
    Query(params): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let format = params
        .format
        .as_deref()
        .and_then(|f| f.parse::<ExportFormat>().ok())
        .unwrap_or_default();
    let limit = parse_count("limit", params.limit.as_deref(), MAX_EXPORT_LIMIT)?;

    let export = state.log().export(format, limit)?;
    let disposition = format!("attachment; filename={}", export.filename);

    Ok((
        [
            (header::CONTENT_TYPE, export.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.body,
    )
        .into_response())
}

/// Documents live in the retrieval provider's dashboard
async fn documents() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Documents are managed in Ragie dashboard",
        "success": true
    }))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS, Method::HEAD])
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600))
}

/// Create the axum router with all endpoints
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/api/chat", post(chat))
        .route("/api/logs", get(list_logs))
        .route("/api/logs/export", get(export_logs))
        .route("/api/logs/:id", get(get_log))
        .route("/api/documents", get(documents))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
