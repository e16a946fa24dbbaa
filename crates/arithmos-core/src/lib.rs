//! Arithmos Core - shared types for the arithmos distributed calculator.
//!
//! This crate provides the data model shared by the parser, the
//! orchestrator, and the agents: operators, tasks, expressions, the
//! dispatch wire protocol, the error taxonomy, and startup configuration.

pub mod config;
pub mod error;
pub mod types;

pub use error::{ManagerError, ParseError};

pub use types::{
    Expression, ExpressionStatus, ExprId, Op, Operand, Priority, Task, TaskAssignment, TaskId,
    TaskRequest, TaskResultResponse, TaskResultSubmission,
};
