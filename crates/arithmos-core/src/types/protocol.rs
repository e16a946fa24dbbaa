//! Wire types for the worker dispatch protocol.
//!
//! Two unary operations carried over HTTP/JSON: pull a ready task, submit
//! a computed result. "No work available" is a protocol-level not-found
//! status, never a transport error; a rejected result travels inside the
//! response envelope.

use serde::{Deserialize, Serialize};

use super::op::Op;
use super::task::TaskId;

/// Request body for pulling the next ready task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRequest {
    /// Advisory identifier of the requesting agent; logged only. The
    /// manager does not track per-agent assignments.
    pub agent_id: String,
}

/// A ready task with fully-resolved operands, handed to exactly one worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAssignment {
    pub task_id: TaskId,
    pub arg1: f64,
    pub arg2: f64,
    pub operation: Op,
    /// Worker sleep before computing, in milliseconds.
    pub operation_time: u32,
    /// Advisory priority (2 for `* /`, 1 otherwise).
    pub priority: u8,
}

/// Request body for reporting a computed result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResultSubmission {
    pub task_id: TaskId,
    pub result: f64,
}

/// Response envelope for a result submission.
///
/// `success = false` carries a human-readable reason (e.g. an unknown
/// task id) without surfacing as a transport failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResultResponse {
    pub success: bool,
    #[serde(default)]
    pub error_message: String,
}
