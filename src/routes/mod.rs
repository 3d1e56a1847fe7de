//! Route definitions for the account API

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::Environment;
use crate::handlers::{health_check, root};
use crate::middleware;
use crate::state::AppState;

mod account;
mod auth;
mod transfer;

pub use account::account_routes;
pub use auth::auth_routes;
pub use transfer::transfer_routes;

/// Build the full application router with its middleware stack
pub fn app_router(
    state: AppState,
    environment: Environment,
    cors_allowed_origins: Option<&str>,
) -> Router {
    let mut app = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(auth_routes())
        .merge(account_routes(state.clone()))
        .merge(transfer_routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::security_headers));

    if environment.is_production() {
        app = app.layer(axum::middleware::from_fn(middleware::hsts_header));
    }

    app.layer(axum::middleware::from_fn(middleware::request_tracing))
        .layer(configure_cors(cors_allowed_origins))
}

fn configure_cors(allowed_origins: Option<&str>) -> CorsLayer {
    let Some(allowed_origins) = allowed_origins else {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any)
}
