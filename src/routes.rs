//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /redirect/{*key}` - Key redirect (public)
//! - `GET  /health`          - Health check: database, cache (public)
//! - `/admin/*`              - Redirect management (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket
//! - **Authentication** - Bearer token on `/admin`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// Rate limiting keys on the peer address, so serve the result with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let admin_router = api::routes::admin_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::secure_layer());

    let public_router = Router::new()
        .route("/redirect/{*key}", get(redirect_handler))
        .layer(rate_limit::layer());

    let router = Router::new()
        .merge(public_router)
        .route("/health", get(health_handler))
        .nest("/admin", admin_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
