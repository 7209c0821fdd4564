//! ptsync Server - sync endpoints for offline-first workout logging.
//!
//! Students' devices pull their assigned plans and recent history from
//! `GET /sync/bootstrap` and deliver queued workouts to `POST /sync/push`.
//! Coaches create and assign plans through `/plans` and maintain their
//! exercise catalog under `/exercises`. Tokens come from `POST /auth/login`.

mod auth;
mod config;
mod db;
mod error;
mod handlers;
mod routes;

use crate::config::Config;
use crate::db::{PgSyncRepository, Pool, SyncRepository};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: Pool,
    pub config: Arc<Config>,
    pub sync: Arc<dyn SyncRepository>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env before the filter reads RUST_LOG
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ptsync_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!("Starting ptsync server on {}:{}", config.host, config.port);

    // Create database pool
    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;

    // Run migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&pool).await?;

    // Build application state
    let state = AppState {
        sync: Arc::new(PgSyncRepository::new(pool.clone())),
        pool,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
