//! JSON endpoints for the dashboard front end.
//!
//! `POST /api/analyze` and its alias `POST /api/analyze-reddit` take
//! `{"keyword": "..."}` and answer with the result record. `GET /api/health`
//! reports that the server is up.

use crate::worker::AnalysisJob;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tower_http::cors::CorsLayer;
use tracing::{debug, error};

pub const KEYWORD_REQUIRED: &str = "Keyword is required";
pub const ANALYSIS_FAILED: &str = "Failed to analyze sentiment";
pub const INTERNAL_ERROR: &str = "Internal server error";
pub const SERVER_RUNNING: &str = "Server is running";

#[derive(Debug, Clone)]
pub struct ApiState {
    jobs: mpsc::Sender<AnalysisJob>,
    port: u16,
}

impl ApiState {
    pub fn new(jobs: mpsc::Sender<AnalysisJob>, port: u16) -> Self {
        Self { jobs, port }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub keyword: Option<String>,
}

impl AnalyzeRequest {
    /// The trimmed keyword; blank counts as absent.
    pub fn keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub port: u16,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze))
        .route("/api/analyze-reddit", post(analyze))
        .route("/api/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn analyze(State(state): State<ApiState>, body: Bytes) -> Response {
    // A body that is not a JSON object is treated like one without a keyword.
    let request: AnalyzeRequest = serde_json::from_slice(&body).unwrap_or_else(|e| {
        debug!("Unreadable analyze request body: {}", e);
        AnalyzeRequest::default()
    });
    let Some(keyword) = request.keyword() else {
        return failure(StatusCode::BAD_REQUEST, KEYWORD_REQUIRED, None);
    };

    let (job, reply) = AnalysisJob::new(keyword);
    if state.jobs.send(job).await.is_err() {
        error!("Analysis worker is not running");
        return failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_ERROR,
            Some("analysis worker is not running".to_string()),
        );
    }

    match reply.await {
        Ok(Ok(record)) => Json(record).into_response(),
        Ok(Err(e)) => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            ANALYSIS_FAILED,
            Some(e.to_string()),
        ),
        Err(_) => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_ERROR,
            Some("analysis was dropped before it finished".to_string()),
        ),
    }
}

async fn health(State(state): State<ApiState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: SERVER_RUNNING.to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        port: state.port,
    })
}

fn failure(status: StatusCode, error: &str, details: Option<String>) -> Response {
    let body = ErrorBody {
        error: error.to_string(),
        details,
    };
    (status, Json(body)).into_response()
}
