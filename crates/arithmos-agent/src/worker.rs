//! The worker loop: pull, sleep, compute, report.

use std::time::Duration;

use arithmos_core::TaskAssignment;
use arithmos_core::config::AgentConfig;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::client::{AgentError, DispatchClient};

/// Run one worker until the process exits.
///
/// Each iteration pulls a task (retrying transport errors with doubling
/// backoff), simulates the operation's latency, computes the result, and
/// delivers it with the same retry policy. When delivery fails for good
/// the task is lost; the manager offers no redelivery, so the worker
/// never re-fetches it.
pub async fn worker_loop(worker_id: usize, client: DispatchClient, config: AgentConfig) {
    let agent_id = Uuid::new_v4().to_string();
    info!(worker_id, agent_id = %agent_id, "worker started");

    loop {
        let Some(task) = fetch_task(&client, &agent_id, &config).await else {
            tokio::time::sleep(config.poll_interval).await;
            continue;
        };

        debug!(
            worker_id,
            task_id = %task.task_id,
            operation = %task.operation,
            arg1 = task.arg1,
            arg2 = task.arg2,
            operation_time = task.operation_time,
            "computing task"
        );
        tokio::time::sleep(Duration::from_millis(u64::from(task.operation_time))).await;
        let result = task.operation.apply(task.arg1, task.arg2);

        deliver_result(&client, &agent_id, &task, result, &config).await;
    }
}

/// Pull the next task, retrying transport errors. `None` covers both "no
/// work available" and retries exhausted; the caller sleeps either way.
async fn fetch_task(
    client: &DispatchClient,
    agent_id: &str,
    config: &AgentConfig,
) -> Option<TaskAssignment> {
    let mut backoff = config.initial_backoff;
    for attempt in 1..=config.max_attempts {
        match client.get_task(agent_id).await {
            Ok(found) => return found,
            Err(err) => {
                warn!(
                    agent_id,
                    attempt,
                    max_attempts = config.max_attempts,
                    error = %err,
                    "failed to fetch task"
                );
                if attempt == config.max_attempts {
                    break;
                }
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
        }
    }
    None
}

/// Deliver a result, retrying transport errors. An in-envelope rejection
/// is final and never retried.
async fn deliver_result(
    client: &DispatchClient,
    agent_id: &str,
    task: &TaskAssignment,
    result: f64,
    config: &AgentConfig,
) {
    let mut backoff = config.initial_backoff;
    for attempt in 1..=config.max_attempts {
        match client.submit_result(task.task_id, result).await {
            Ok(()) => {
                debug!(agent_id, task_id = %task.task_id, result, "result delivered");
                return;
            }
            Err(AgentError::Rejected(message)) => {
                warn!(agent_id, task_id = %task.task_id, message, "result rejected");
                return;
            }
            Err(err) => {
                warn!(
                    agent_id,
                    task_id = %task.task_id,
                    attempt,
                    max_attempts = config.max_attempts,
                    error = %err,
                    "failed to deliver result"
                );
                if attempt == config.max_attempts {
                    break;
                }
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
        }
    }
    error!(agent_id, task_id = %task.task_id, "giving up on delivery, task is lost");
}
