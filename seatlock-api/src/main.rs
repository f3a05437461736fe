use anyhow::Context;
use seatlock_api::{app, startup};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seatlock_api=debug,seatlock_holds=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = seatlock_store::app_config::Config::load().context("Failed to load config")?;
    tracing::info!("Starting seatlock on port {}", config.server.port);

    let services = startup::bootstrap(&config)
        .await
        .context("Startup failed")?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(services.state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // the router and its state are gone, so the queue drains and closes
    if let Err(e) = services.dispatcher.await {
        tracing::warn!("Status dispatcher ended abnormally: {}", e);
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
