use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use walletpass::api::{self, AppState};
use walletpass::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "walletpass=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting walletpass server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        issuer_id = %config.issuer_id,
        class_lookup_policy = ?config.class_lookup_policy,
        "Configuration loaded successfully"
    );

    // Credentials and signing key are loaded once and shared read-only
    let state = AppState::from_config(&config)?;
    tracing::info!(
        client_email = %config.service_account.client_email,
        "Service account credentials initialized"
    );

    let app = api::router(state, &config.static_dir);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C signal handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, cleaning up...");
}
