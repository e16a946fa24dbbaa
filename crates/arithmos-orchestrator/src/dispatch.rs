//! HTTP dispatch endpoint serving concurrent workers.
//!
//! Two unary operations wrap the manager: pull the next ready task and
//! submit a result. "No work available" is a 404 with a JSON body,
//! distinct from any transport failure; a rejected result travels inside
//! the 200 response envelope.

use std::sync::Arc;

use arithmos_core::{TaskAssignment, TaskRequest, TaskResultResponse, TaskResultSubmission};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::manager::TaskManager;

/// Message size cap, both directions.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone)]
struct AppState {
    manager: Arc<TaskManager>,
}

/// Build the dispatch router around a manager.
pub fn router(manager: Arc<TaskManager>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/tasks/next", post(next_task))
        .route("/v1/tasks/result", post(submit_result))
        .with_state(AppState { manager })
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn next_task(
    State(state): State<AppState>,
    Json(request): Json<TaskRequest>,
) -> Result<Json<TaskAssignment>, ApiError> {
    match state.manager.take_next_ready_task() {
        Some(assignment) => {
            info!(
                agent_id = %request.agent_id,
                task_id = %assignment.task_id,
                operation = %assignment.operation,
                operation_time = assignment.operation_time,
                "task dispatched"
            );
            Ok(Json(assignment))
        }
        None => Err(ApiError::not_found("no tasks available")),
    }
}

async fn submit_result(
    State(state): State<AppState>,
    Json(submission): Json<TaskResultSubmission>,
) -> Json<TaskResultResponse> {
    match state
        .manager
        .submit_result(submission.task_id, submission.result)
        .await
    {
        Ok(()) => Json(TaskResultResponse {
            success: true,
            error_message: String::new(),
        }),
        Err(err) => {
            warn!(task_id = %submission.task_id, error = %err, "result rejected");
            Json(TaskResultResponse {
                success: false,
                error_message: err.to_string(),
            })
        }
    }
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}
