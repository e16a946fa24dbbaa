//! Arithmetic operators and their scheduling priority.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The operation a task performs.
///
/// `Literal` is the sentinel for a task that carries a pre-known value and
/// requires no arithmetic: a worker returns `arg1` unchanged after zero
/// sleep. On the wire it is spelled `"literal"`; the four arithmetic
/// operators use their usual symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "literal")]
    Literal,
}

impl Op {
    /// Map an operator character to its `Op`, if it is one.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Op::Add),
            '-' => Some(Op::Sub),
            '*' => Some(Op::Mul),
            '/' => Some(Op::Div),
            _ => None,
        }
    }

    /// Infix binding strength: 2 for `* /`, 1 for `+ -`.
    ///
    /// All operators are left-associative. `Literal` never appears in
    /// infix position and binds tightest of all.
    pub fn precedence(self) -> u8 {
        match self {
            Op::Add | Op::Sub => 1,
            Op::Mul | Op::Div => 2,
            Op::Literal => 3,
        }
    }

    /// Advisory scheduling priority: multiplicative operators first.
    pub fn priority(self) -> Priority {
        match self {
            Op::Mul | Op::Div => Priority::High,
            Op::Add | Op::Sub | Op::Literal => Priority::Normal,
        }
    }

    /// Apply the operator the way a worker does.
    ///
    /// Division by zero yields `0.0` rather than an error; `Literal`
    /// yields `arg1` unchanged.
    pub fn apply(self, arg1: f64, arg2: f64) -> f64 {
        match self {
            Op::Add => arg1 + arg2,
            Op::Sub => arg1 - arg2,
            Op::Mul => arg1 * arg2,
            Op::Div => {
                if arg2 == 0.0 {
                    0.0
                } else {
                    arg1 / arg2
                }
            }
            Op::Literal => arg1,
        }
    }

    /// The wire spelling of this operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Literal => "literal",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Task scheduling priority.
///
/// Advisory only: the manager may prefer `High` tasks when several are
/// ready, but offers no ordering guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Priority {
    /// Additive operators and literals.
    Normal = 1,
    /// Multiplicative operators.
    High = 2,
}

impl Priority {
    /// Numeric value used on the wire (1 or 2).
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}
