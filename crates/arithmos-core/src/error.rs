//! Error taxonomy for the arithmos core.
//!
//! Parse errors abort expression creation and map to 4xx responses in the
//! embedding HTTP layer. Manager errors travel back to workers inside the
//! dispatch response envelope.

use thiserror::Error;

use crate::types::TaskId;

/// Errors produced while turning source text into a task DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input was empty after whitespace stripping.
    #[error("empty expression")]
    EmptyExpression,

    /// The tokenizer met a byte outside the accepted alphabet.
    #[error("invalid character: {0}")]
    InvalidCharacter(char),

    /// Unbalanced `(` or `)` detected during shunting-yard conversion.
    #[error("mismatched parentheses")]
    MismatchedParentheses,

    /// Structural failure: an operator with fewer than two operands, a
    /// malformed numeric literal, or leftover operands.
    #[error("invalid expression")]
    InvalidExpression,

    /// A divisor evaluated to zero on the validation path.
    #[error("division by zero")]
    DivisionByZero,
}

/// Errors produced by task-manager operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ManagerError {
    /// A result was submitted for an id the manager does not track.
    #[error("unknown task: {0}")]
    UnknownTask(TaskId),
}
