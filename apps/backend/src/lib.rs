pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use lexicon_core::{Clock, ReviewScheduler, SystemClock};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub scheduler: Arc<ReviewScheduler>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<Config>,
}

impl AppState {
    /// State with the default interval table and the system clock
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db: Arc::new(db),
            scheduler: Arc::new(ReviewScheduler::default()),
            clock: Arc::new(SystemClock),
            config: Arc::new(config),
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // User routes
        .route("/api/users/me", get(routes::users::me))
        // Vocabulary routes
        .route(
            "/api/vocabulary",
            get(routes::vocabulary::list).post(routes::vocabulary::create),
        )
        .route("/api/vocabulary/import", post(routes::vocabulary::import))
        .route(
            "/api/vocabulary/:id",
            get(routes::vocabulary::detail).delete(routes::vocabulary::delete),
        )
        // Progress routes
        .route("/api/progress", post(routes::progress::update_batch))
        .route("/api/progress/status", post(routes::progress::update_status))
        .route("/api/progress/exposure", post(routes::progress::record_exposure))
        // Review routes
        .route("/api/review/session", get(routes::review::session))
        .route(
            "/api/review/session/:session_id/complete",
            post(routes::review::complete),
        )
        .route("/api/review/due", get(routes::review::due))
        .route("/api/review/difficult", get(routes::review::difficult))
        .route("/api/review/reviewed", get(routes::review::reviewed))
        // Stats routes
        .route("/api/stats", get(routes::stats::summary))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/users/register", post(routes::users::register))
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url, config.max_connections).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let seeded = db.seed_preset_lists().await?;
    if seeded > 0 {
        tracing::info!("Seeded {} preset vocabulary lists", seeded);
    }

    let addr = config.bind_addr();
    let app = build_router(AppState::new(db, config));

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
