use std::sync::Arc;

use herald_notification::config::AppConfig;
use herald_notification::{routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    herald_shared::middleware::init_tracing("herald-notification");

    let config = AppConfig::load()?;
    let port = config.port;

    let metrics_handle = herald_shared::middleware::init_metrics()?;

    let state = Arc::new(AppState::from_config(config, Some(metrics_handle))?);
    let app = routes::router(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "herald-notification starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
