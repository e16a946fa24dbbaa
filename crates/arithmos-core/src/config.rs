//! Startup configuration, read once from environment variables.
//!
//! Missing or unparsable values log a warning and fall back to their
//! defaults; configuration loading never fails.

use std::net::SocketAddr;
use std::time::Duration;

use tracing::warn;

use crate::types::Op;

/// Per-operator artificial latency defaults, in milliseconds.
pub const DEFAULT_ADDITION_MS: u32 = 510;
pub const DEFAULT_SUBTRACTION_MS: u32 = 520;
pub const DEFAULT_MULTIPLICATION_MS: u32 = 530;
pub const DEFAULT_DIVISION_MS: u32 = 540;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8081";
const DEFAULT_DISPATCH_URL: &str = "http://127.0.0.1:8081";
const DEFAULT_COMPUTING_POWER: usize = 4;

/// Per-operator latencies looked up at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationTimings {
    pub add_ms: u32,
    pub sub_ms: u32,
    pub mul_ms: u32,
    pub div_ms: u32,
}

impl OperationTimings {
    /// Read `TIME_ADDITION_MS`, `TIME_SUBTRACTION_MS`,
    /// `TIME_MULTIPLICATIONS_MS`, and `TIME_DIVISIONS_MS`.
    pub fn from_env() -> Self {
        Self {
            add_ms: env_parsed("TIME_ADDITION_MS", DEFAULT_ADDITION_MS),
            sub_ms: env_parsed("TIME_SUBTRACTION_MS", DEFAULT_SUBTRACTION_MS),
            mul_ms: env_parsed("TIME_MULTIPLICATIONS_MS", DEFAULT_MULTIPLICATION_MS),
            div_ms: env_parsed("TIME_DIVISIONS_MS", DEFAULT_DIVISION_MS),
        }
    }

    /// The configured latency for an operator; literals carry none.
    pub fn latency_for(&self, op: Op) -> u32 {
        match op {
            Op::Add => self.add_ms,
            Op::Sub => self.sub_ms,
            Op::Mul => self.mul_ms,
            Op::Div => self.div_ms,
            Op::Literal => 0,
        }
    }
}

impl Default for OperationTimings {
    fn default() -> Self {
        Self {
            add_ms: DEFAULT_ADDITION_MS,
            sub_ms: DEFAULT_SUBTRACTION_MS,
            mul_ms: DEFAULT_MULTIPLICATION_MS,
            div_ms: DEFAULT_DIVISION_MS,
        }
    }
}

/// Orchestrator-side configuration.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Address the dispatch endpoint listens on.
    pub listen_addr: SocketAddr,
    /// Per-operator latencies stamped onto emitted tasks.
    pub timings: OperationTimings,
}

impl OrchestratorConfig {
    /// Read `ORCHESTRATOR_ADDR` plus the operation timings.
    pub fn from_env() -> Self {
        Self {
            listen_addr: env_parsed("ORCHESTRATOR_ADDR", default_listen_addr()),
            timings: OperationTimings::from_env(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    DEFAULT_LISTEN_ADDR
        .parse()
        .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8081)))
}

/// Agent-side configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Base URL of the dispatch endpoint.
    pub dispatch_url: String,
    /// Number of parallel worker loops on this host.
    pub computing_power: usize,
    /// Sleep between polls when no work is available.
    pub poll_interval: Duration,
    /// Per-request deadline.
    pub request_timeout: Duration,
    /// Attempts per dispatch call before giving up.
    pub max_attempts: u32,
    /// Initial retry backoff; doubles per attempt.
    pub initial_backoff: Duration,
}

impl AgentConfig {
    /// Read `ORCHESTRATOR_URL` and `COMPUTING_POWER`.
    pub fn from_env() -> Self {
        let dispatch_url = match std::env::var("ORCHESTRATOR_URL") {
            Ok(url) if !url.is_empty() => url,
            _ => {
                warn!(
                    key = "ORCHESTRATOR_URL",
                    default = DEFAULT_DISPATCH_URL,
                    "environment variable not set, using default"
                );
                DEFAULT_DISPATCH_URL.to_string()
            }
        };
        Self {
            dispatch_url,
            computing_power: env_parsed("COMPUTING_POWER", DEFAULT_COMPUTING_POWER),
            ..Self::default()
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            dispatch_url: DEFAULT_DISPATCH_URL.to_string(),
            computing_power: DEFAULT_COMPUTING_POWER,
            poll_interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(10),
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

/// Read and parse an environment variable, warning and falling back to
/// `default` when it is absent or unparsable.
fn env_parsed<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Debug,
{
    match std::env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, value = %raw, ?default, "unparsable environment variable, using default");
                default
            }
        },
        Err(_) => {
            warn!(key, ?default, "environment variable not set, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings() {
        let timings = OperationTimings::default();
        assert_eq!(timings.add_ms, 510);
        assert_eq!(timings.sub_ms, 520);
        assert_eq!(timings.mul_ms, 530);
        assert_eq!(timings.div_ms, 540);
    }

    #[test]
    fn test_latency_lookup() {
        let timings = OperationTimings::default();
        assert_eq!(timings.latency_for(Op::Add), 510);
        assert_eq!(timings.latency_for(Op::Sub), 520);
        assert_eq!(timings.latency_for(Op::Mul), 530);
        assert_eq!(timings.latency_for(Op::Div), 540);
        assert_eq!(timings.latency_for(Op::Literal), 0);
    }

    #[test]
    fn test_agent_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.computing_power, 4);
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.initial_backoff, Duration::from_secs(1));
    }
}
