//! booking-mock server binary

use std::sync::Arc;

use booking_mock::{MockConfig, MockState, logger, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载 .env 文件
    let _ = dotenvy::dotenv();

    let config = MockConfig::from_env();
    logger::init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref())?;

    let state = Arc::new(MockState::new(MockState::schedule(config.seats_per_slot)));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    tracing::info!(
        "booking-mock listening on http://{}/api ({} seats per slot)",
        config.addr,
        config.seats_per_slot
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("booking-mock stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
