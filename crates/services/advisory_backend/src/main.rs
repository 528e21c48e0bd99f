// File: services/advisory_backend/src/main.rs
use advisory_backend::AppState;
use advisory_common::{logging, AdvisoryError, Context};
use advisory_config::load_config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), AdvisoryError> {
    logging::init();

    let config = Arc::new(logging::log_result(
        load_config(),
        "Configuration loaded",
        "Failed to load configuration",
    )?);
    let state = AppState::new(Arc::clone(&config))?;
    let _sweeper = state.schedule.spawn_idle_sweeper();
    let app = state.router();

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
