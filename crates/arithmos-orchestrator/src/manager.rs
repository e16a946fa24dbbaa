//! The task manager: owns the DAG of live expressions and tasks.
//!
//! All graph state sits behind a single lock; `take_next_ready_task` and
//! `submit_result` execute atomically end-to-end so no worker ever
//! observes an expression mid-completion. Cross-references between maps
//! are ids, never pointers.

use std::collections::HashMap;
use std::sync::Arc;

use arithmos_core::config::OperationTimings;
use arithmos_core::{
    ExprId, Expression, ExpressionStatus, ManagerError, Operand, ParseError, Priority, Task,
    TaskAssignment, TaskId,
};
use arithmos_parser::parse_expression;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::store::{ExpressionStore, persistence_loop};

/// Completion snapshots buffered for the persistence worker. A full
/// buffer applies backpressure to `submit_result` rather than dropping a
/// snapshot.
const PERSIST_QUEUE_DEPTH: usize = 64;

/// All live graph state, keyed by task or expression id.
#[derive(Default)]
struct GraphState {
    /// Header records; completed expressions stay here for the lifetime
    /// of the process.
    expressions: HashMap<ExprId, Expression>,
    /// Tasks not yet handed to a worker.
    tasks: HashMap<TaskId, Task>,
    /// Completed task results awaiting expression finalization.
    results: HashMap<TaskId, f64>,
    /// Reverse pointer from task to enclosing expression.
    task_to_expr: HashMap<TaskId, ExprId>,
    /// Tasks per expression in parser emission order; the last entry is
    /// the root.
    expr_tasks: HashMap<ExprId, Vec<TaskId>>,
}

/// Owner of all expression and task state.
pub struct TaskManager {
    state: RwLock<GraphState>,
    timings: OperationTimings,
    persist_tx: mpsc::Sender<Expression>,
}

impl TaskManager {
    /// Create a manager and spawn its background persistence worker.
    ///
    /// Must run inside a tokio runtime.
    pub fn new(timings: OperationTimings, store: Arc<dyn ExpressionStore>) -> Arc<Self> {
        let (persist_tx, persist_rx) = mpsc::channel(PERSIST_QUEUE_DEPTH);
        tokio::spawn(persistence_loop(persist_rx, store));
        Arc::new(Self {
            state: RwLock::new(GraphState::default()),
            timings,
            persist_tx,
        })
    }

    /// Parse a submission and install its expression and tasks atomically.
    ///
    /// A rejected submission installs nothing: parsing runs in a single
    /// pass before any state is touched, so there is no half-recorded
    /// `ERROR` expression to clean up.
    pub fn create_expression(
        &self,
        source_text: &str,
        owner_id: i64,
    ) -> Result<ExprId, ParseError> {
        let tasks = parse_expression(source_text, &self.timings)?;

        let expr = Expression::new(source_text, owner_id);
        let expr_id = expr.id;
        let task_ids: Vec<TaskId> = tasks.iter().map(|task| task.id).collect();

        let mut state = self.state.write();
        for task in tasks {
            state.task_to_expr.insert(task.id, expr_id);
            state.tasks.insert(task.id, task);
        }
        state.expr_tasks.insert(expr_id, task_ids.clone());
        state.expressions.insert(expr_id, expr);

        info!(
            expr_id = %expr_id,
            owner_id,
            source = source_text,
            tasks = task_ids.len(),
            "expression installed"
        );
        Ok(expr_id)
    }

    /// Hand out some ready task with its dependency results substituted,
    /// or `None` when nothing is ready.
    ///
    /// A task is ready when every `depends_on` entry has a recorded
    /// result. Higher-priority tasks are preferred when several are
    /// ready. Each task is handed out at most once; this never blocks.
    pub fn take_next_ready_task(&self) -> Option<TaskAssignment> {
        let mut state = self.state.write();

        let mut picked: Option<(TaskId, Priority)> = None;
        for (id, task) in &state.tasks {
            let ready = task
                .depends_on
                .iter()
                .all(|dep| state.results.contains_key(dep));
            if !ready {
                continue;
            }
            match picked {
                Some((_, priority)) if priority >= task.priority => {}
                _ => picked = Some((*id, task.priority)),
            }
            if task.priority == Priority::High {
                break;
            }
        }

        let (id, _) = picked?;
        let task = state.tasks.remove(&id)?;
        let assignment = resolve_assignment(task, &state.results);
        debug!(
            task_id = %assignment.task_id,
            operation = %assignment.operation,
            arg1 = assignment.arg1,
            arg2 = assignment.arg2,
            "task ready for hand-off"
        );
        Some(assignment)
    }

    /// Record a worker's result and finalize the expression if it was the
    /// last outstanding task.
    ///
    /// On completion the expression's snapshot is handed to the
    /// persistence worker after the lock is released; a storage failure
    /// never unwinds the in-memory completion.
    pub async fn submit_result(&self, task_id: TaskId, value: f64) -> Result<(), ManagerError> {
        let completed = {
            let mut state = self.state.write();
            record_result(&mut state, task_id, value)?
        };

        if let Some(snapshot) = completed {
            if self.persist_tx.send(snapshot).await.is_err() {
                warn!(task_id = %task_id, "persistence worker is gone, completion not saved");
            }
        }
        Ok(())
    }

    /// Look up one expression by id.
    pub fn expression(&self, id: ExprId) -> Option<Expression> {
        self.state.read().expressions.get(&id).cloned()
    }

    /// Every expression the manager has seen, in no particular order.
    pub fn all_expressions(&self) -> Vec<Expression> {
        self.state.read().expressions.values().cloned().collect()
    }

    /// Every expression submitted by one principal.
    pub fn expressions_for_owner(&self, owner_id: i64) -> Vec<Expression> {
        self.state
            .read()
            .expressions
            .values()
            .filter(|expr| expr.owner_id == owner_id)
            .cloned()
            .collect()
    }

    /// Number of tasks not yet handed to a worker.
    pub fn live_task_count(&self) -> usize {
        self.state.read().tasks.len()
    }
}

/// Substitute dependency results into pending slots, positionally.
///
/// Readiness was checked before the task left the live set, so every
/// pending slot has a recorded result.
fn resolve_assignment(task: Task, results: &HashMap<TaskId, f64>) -> TaskAssignment {
    let mut deps = task.depends_on.iter();
    let mut resolved = [0.0f64; 2];
    for (value, slot) in resolved.iter_mut().zip(task.args) {
        *value = match slot {
            Operand::Literal(literal) => literal,
            Operand::Pending => {
                let filled = deps.next().and_then(|dep| results.get(dep)).copied();
                debug_assert!(filled.is_some(), "pending slot without a ready dependency");
                filled.unwrap_or_default()
            }
        };
    }

    TaskAssignment {
        task_id: task.id,
        arg1: resolved[0],
        arg2: resolved[1],
        operation: task.op,
        operation_time: task.latency_ms,
        priority: task.priority.as_u8(),
    }
}

/// Record one result; returns the completed expression snapshot when this
/// was the expression's last outstanding task.
fn record_result(
    state: &mut GraphState,
    task_id: TaskId,
    value: f64,
) -> Result<Option<Expression>, ManagerError> {
    let Some(expr_id) = state.task_to_expr.get(&task_id).copied() else {
        return Err(ManagerError::UnknownTask(task_id));
    };
    state.results.insert(task_id, value);
    debug!(task_id = %task_id, expr_id = %expr_id, value, "result recorded");

    let Some(task_ids) = state.expr_tasks.get(&expr_id) else {
        return Ok(None);
    };
    if !task_ids.iter().all(|id| state.results.contains_key(id)) {
        return Ok(None);
    }

    // The parser emits the root last.
    let Some(&root) = task_ids.last() else {
        return Ok(None);
    };
    let final_result = state.results.get(&root).copied().unwrap_or_default();

    let task_ids = task_ids.clone();
    for id in &task_ids {
        state.tasks.remove(id);
        state.results.remove(id);
        state.task_to_expr.remove(id);
    }
    state.expr_tasks.remove(&expr_id);

    let Some(expr) = state.expressions.get_mut(&expr_id) else {
        return Ok(None);
    };
    expr.status = ExpressionStatus::Completed;
    expr.result = Some(final_result);
    info!(
        expr_id = %expr_id,
        source = %expr.source_text,
        result = final_result,
        "expression completed"
    );
    Ok(Some(expr.clone()))
}
