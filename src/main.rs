//! Account API Server
//!
//! Serves account management and token-based login over HTTP, backed by
//! PostgreSQL.

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

use account_api::auth::TokenService;
use account_api::config::Config;
use account_api::routes;
use account_api::state::AppState;
use account_api::store::PgAccountStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!(environment = config.environment.as_str(), "Starting account API");

    let tokens = TokenService::new(
        config.jwt_secret.as_bytes(),
        chrono::Duration::seconds(config.jwt_ttl_seconds),
    )
    .context("token signing is not configured")?;

    let store = PgAccountStore::connect(
        &config.database_url,
        &config.database_url_masked(),
        config.db_max_connections,
    )
    .await
    .context("account database is unavailable")?;
    store.migrate().await.context("account schema migration failed")?;

    let store = Arc::new(store);
    let app_state = AppState::from_parts(store, tokens, config.bcrypt_cost);

    let app = routes::app_router(
        app_state,
        config.environment,
        config.cors_allowed_origins.as_deref(),
    );

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check at http://{}/health", addr);

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
