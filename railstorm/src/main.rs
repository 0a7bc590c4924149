use railstorm::{WorkloadConfig, WorkloadLoop};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "railstorm=info".to_string()),
        )
        .init();

    let config = WorkloadConfig::from_env()?;
    info!(base_url = %config.base_url, date = %config.travel_date, "starting workload");

    let shutdown = CancellationToken::new();
    let handle = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping after the current iteration");
            handle.cancel();
        }
    });

    WorkloadLoop::new(config).run(shutdown).await;
    Ok(())
}
