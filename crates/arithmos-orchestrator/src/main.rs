use std::sync::Arc;

use arithmos_core::config::OrchestratorConfig;
use arithmos_orchestrator::dispatch;
use arithmos_orchestrator::manager::TaskManager;
use arithmos_orchestrator::store::LogStore;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,arithmos_orchestrator=debug".to_string()),
        )
        .init();

    let config = OrchestratorConfig::from_env();
    info!(
        add_ms = config.timings.add_ms,
        sub_ms = config.timings.sub_ms,
        mul_ms = config.timings.mul_ms,
        div_ms = config.timings.div_ms,
        "operation timings loaded"
    );

    let manager = TaskManager::new(config.timings.clone(), Arc::new(LogStore));
    let app = dispatch::router(manager);

    info!(addr = %config.listen_addr, "starting dispatch endpoint");
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
