//! In-memory task records.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::op::{Op, Priority};

/// Unique task identifier, rendered as hyphenated UUID text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Allocate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One operand slot of a task.
///
/// `Pending` marks a slot whose value arrives from a dependency result at
/// hand-off time. A literal `0.0` stays `Literal(0.0)` and is never
/// mistaken for a placeholder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    /// A concrete value supplied at parse time.
    Literal(f64),
    /// Filled in from a dependency's result.
    Pending,
}

impl Operand {
    /// Whether this slot still awaits a dependency result.
    #[inline]
    pub fn is_pending(self) -> bool {
        matches!(self, Operand::Pending)
    }

    /// The concrete value, if the slot holds one.
    pub fn value(self) -> Option<f64> {
        match self {
            Operand::Literal(v) => Some(v),
            Operand::Pending => None,
        }
    }
}

/// An in-memory record of one pending binary operation.
///
/// Created at parse time, handed to exactly one worker, and dropped from
/// the live set upon hand-off.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Unique identifier.
    pub id: TaskId,
    /// The operation to perform, or the `literal` sentinel.
    pub op: Op,
    /// Operand slots in left-to-right order.
    pub args: [Operand; 2],
    /// How long a worker sleeps before returning the result, in ms.
    pub latency_ms: u32,
    /// Advisory scheduling priority.
    pub priority: Priority,
    /// Tasks whose results fill the `Pending` slots, positionally: the
    /// i-th entry fills the i-th pending slot in operand order.
    pub depends_on: Vec<TaskId>,
}

impl Task {
    /// A task carrying a pre-known value: no arithmetic, no latency, no
    /// dependencies. Workers echo `arg1` back.
    pub fn literal(value: f64) -> Self {
        Self {
            id: TaskId::new(),
            op: Op::Literal,
            args: [Operand::Literal(value), Operand::Literal(0.0)],
            latency_ms: 0,
            priority: Priority::Normal,
            depends_on: Vec::new(),
        }
    }

    /// Count of operand slots awaiting a dependency result.
    pub fn pending_slots(&self) -> usize {
        self.args.iter().filter(|slot| slot.is_pending()).count()
    }
}
