//! Expression records: one per submitted source string.

use std::fmt;

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique expression identifier, rendered as hyphenated UUID text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExprId(Uuid);

impl ExprId {
    /// Allocate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExprId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The only user-visible timestamp format: local time, `dd.mm.yyyy HH:MM:SS`.
pub const CREATED_AT_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Lifecycle state of an expression.
///
/// An expression is created in `Processing` and transitions exactly once,
/// to `Completed` when its root task resolves. `Error` is reserved for
/// embedders that record rejected submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpressionStatus {
    #[serde(rename = "PROCESSING")]
    Processing,
    #[serde(rename = "COMPLETED")]
    Completed,
    #[serde(rename = "ERROR")]
    Error,
}

impl fmt::Display for ExpressionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ExpressionStatus::Processing => "PROCESSING",
            ExpressionStatus::Completed => "COMPLETED",
            ExpressionStatus::Error => "ERROR",
        };
        f.write_str(text)
    }
}

/// Header record aggregating one parsed submission.
///
/// Lives in the manager for the lifetime of the process; this is also the
/// by-value snapshot handed to the persistence collaborator on completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    /// Unique identifier.
    pub id: ExprId,
    /// The original submission string.
    pub source_text: String,
    /// Lifecycle state.
    pub status: ExpressionStatus,
    /// Final value; present only once `status` is `Completed`.
    pub result: Option<f64>,
    /// Local creation time, `dd.mm.yyyy HH:MM:SS`.
    pub created_at: String,
    /// The submitting principal, opaque to the core.
    pub owner_id: i64,
}

impl Expression {
    /// A fresh `Processing` expression stamped with the current local time.
    pub fn new(source_text: impl Into<String>, owner_id: i64) -> Self {
        Self {
            id: ExprId::new(),
            source_text: source_text.into(),
            status: ExpressionStatus::Processing,
            result: None,
            created_at: Local::now().format(CREATED_AT_FORMAT).to_string(),
            owner_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;

    #[test]
    fn test_new_expression_is_processing() {
        let expr = Expression::new("2+3", 7);
        assert_eq!(expr.status, ExpressionStatus::Processing);
        assert_eq!(expr.result, None);
        assert_eq!(expr.source_text, "2+3");
        assert_eq!(expr.owner_id, 7);
    }

    #[test]
    fn test_created_at_format_round_trips() {
        let expr = Expression::new("1+1", 0);
        assert!(NaiveDateTime::parse_from_str(&expr.created_at, CREATED_AT_FORMAT).is_ok());
    }

    #[test]
    fn test_status_wire_spelling() {
        assert_eq!(
            serde_json::to_string(&ExpressionStatus::Processing).unwrap(),
            "\"PROCESSING\""
        );
        assert_eq!(
            serde_json::to_string(&ExpressionStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );
        assert_eq!(ExpressionStatus::Error.to_string(), "ERROR");
    }
}
