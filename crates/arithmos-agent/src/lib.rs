//! Arithmos worker agent.
//!
//! An agent runs `COMPUTING_POWER` independent worker loops against one
//! dispatch endpoint. Each loop pulls a task, sleeps for the task's
//! configured latency, applies the operator, and posts the result back.
//! Workers share no state with each other.

pub mod client;
pub mod worker;

pub use client::{AgentError, DispatchClient};
pub use worker::worker_loop;
