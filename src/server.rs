//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, cache and service wiring, and the
//! Axum server lifecycle.

use crate::application::services::AuthService;
use crate::config::Config;
use crate::domain::repositories::RedirectRepository;
use crate::infrastructure::cache::CacheStore;
use crate::infrastructure::persistence::PgRedirectRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - In-memory redirect cache
/// - Axum HTTP server with graceful shutdown on Ctrl-C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    let repository: Arc<dyn RedirectRepository> = Arc::new(PgRedirectRepository::with_timeout(
        Arc::new(pool),
        Duration::from_millis(config.db_query_timeout_ms),
    ));

    let cache = Arc::new(CacheStore::open());
    tracing::info!("Redirect cache ready (in-memory)");

    let auth_service = Arc::new(
        AuthService::new(&config.admin_token, config.token_signing_secret.clone())
            .context("Failed to initialize admin authentication")?,
    );

    let state = AppState::new(repository, cache, auth_service);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
