use std::sync::Arc;

use dira::{store, AppState, Config, LogNotifier};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!(?config, "configuration loaded");

    let store = store::connect(&config.database_url, config.db_max_connections).await?;
    if let Some(seed_file) = &config.seed_file {
        store::seed_from_file(store.as_ref(), seed_file).await?;
    }

    let app_state = AppState {
        store,
        notifier: Arc::new(LogNotifier),
    };
    let app = dira::app(app_state, config.request_timeout);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
