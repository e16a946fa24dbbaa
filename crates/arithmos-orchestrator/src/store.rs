//! Persistence of completed expressions.
//!
//! The manager never blocks on storage: completion snapshots travel over
//! a bounded channel to a background worker that invokes the
//! [`ExpressionStore`] collaborator. Save failures are logged and
//! swallowed; an in-memory completion is never unwound.

use std::sync::Arc;

use arithmos_core::Expression;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Errors reported by a storage collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage failure: {0}")]
    Storage(String),
}

/// External storage collaborator, invoked exactly once per expression on
/// its transition to `COMPLETED` with a by-value snapshot.
///
/// Implementations may block on I/O; they run on the persistence worker,
/// never under the manager lock. Saves across distinct expressions may be
/// reordered.
#[async_trait]
pub trait ExpressionStore: Send + Sync {
    async fn save_expression(&self, snapshot: &Expression) -> Result<(), StoreError>;
}

/// Drain completion snapshots and hand them to the store.
pub(crate) async fn persistence_loop(
    mut rx: mpsc::Receiver<Expression>,
    store: Arc<dyn ExpressionStore>,
) {
    while let Some(snapshot) = rx.recv().await {
        if let Err(err) = store.save_expression(&snapshot).await {
            error!(
                expr_id = %snapshot.id,
                error = %err,
                "failed to save completed expression"
            );
        }
    }
}

/// Stand-in collaborator that records completions as structured log
/// lines. Deployments wanting durable history swap in their own store.
pub struct LogStore;

#[async_trait]
impl ExpressionStore for LogStore {
    async fn save_expression(&self, snapshot: &Expression) -> Result<(), StoreError> {
        info!(
            expr_id = %snapshot.id,
            owner_id = snapshot.owner_id,
            source = %snapshot.source_text,
            result = ?snapshot.result,
            created_at = %snapshot.created_at,
            "expression saved"
        );
        Ok(())
    }
}
