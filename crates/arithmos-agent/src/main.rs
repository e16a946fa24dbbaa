use arithmos_agent::client::DispatchClient;
use arithmos_agent::worker::worker_loop;
use arithmos_core::config::AgentConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,arithmos_agent=debug".to_string()),
        )
        .init();

    let config = AgentConfig::from_env();
    info!(
        dispatch_url = %config.dispatch_url,
        computing_power = config.computing_power,
        "agent starting"
    );

    let mut handles = Vec::with_capacity(config.computing_power);
    for worker_id in 0..config.computing_power {
        let client = DispatchClient::new(&config.dispatch_url, config.request_timeout)?;
        let config = config.clone();
        handles.push(tokio::spawn(worker_loop(worker_id, client, config)));
    }
    for handle in handles {
        handle.await?;
    }
    Ok(())
}
