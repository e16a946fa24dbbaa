//! HTTP client for the dispatch endpoint.

use std::time::Duration;

use arithmos_core::{TaskAssignment, TaskId, TaskRequest, TaskResultResponse, TaskResultSubmission};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

/// Errors a worker sees when talking to the dispatch endpoint.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The request never produced a usable response; retryable.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with an unexpected HTTP status; retryable.
    #[error("unexpected status: {0}")]
    Status(StatusCode),

    /// The endpoint processed the request and said no, inside the
    /// envelope. Not retryable.
    #[error("dispatch rejected result: {0}")]
    Rejected(String),
}

impl AgentError {
    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, AgentError::Rejected(_))
    }
}

/// Client for the two dispatch operations.
pub struct DispatchClient {
    http: reqwest::Client,
    base_url: String,
}

impl DispatchClient {
    /// Build a client with a per-request deadline.
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self, AgentError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    /// Ask for the next ready task. `Ok(None)` means no work is
    /// available right now; transport failures surface as errors.
    pub async fn get_task(&self, agent_id: &str) -> Result<Option<TaskAssignment>, AgentError> {
        let response = self
            .http
            .post(format!("{}/v1/tasks/next", self.base_url))
            .json(&TaskRequest {
                agent_id: agent_id.to_string(),
            })
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(agent_id, "no tasks available");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AgentError::Status(response.status()));
        }

        let assignment: TaskAssignment = response.json().await?;
        debug!(agent_id, task_id = %assignment.task_id, "task received");
        Ok(Some(assignment))
    }

    /// Report a computed result. A `success = false` envelope becomes
    /// [`AgentError::Rejected`].
    pub async fn submit_result(&self, task_id: TaskId, result: f64) -> Result<(), AgentError> {
        let response = self
            .http
            .post(format!("{}/v1/tasks/result", self.base_url))
            .json(&TaskResultSubmission { task_id, result })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AgentError::Status(response.status()));
        }

        let body: TaskResultResponse = response.json().await?;
        if body.success {
            Ok(())
        } else {
            Err(AgentError::Rejected(body.error_message))
        }
    }
}
