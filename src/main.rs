//! Birthday Board Backend
//!
//! A multi-user REST backend for tracking birthdays over SQLite, with outbound
//! geocoding and fun-fact generation.

mod api;
mod auth;
mod calendar;
mod clients;
mod config;
mod db;
mod errors;
mod models;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use clients::{FactsClient, GeocodeClient};
use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub geocode: GeocodeClient,
    pub facts: FactsClient,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Birthday Board Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.admin_email.is_none() {
        tracing::warn!(
            "No admin email configured (BIRTHDAYS_ADMIN_EMAIL); every account is limited to one record"
        );
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    let purged = repo.purge_expired_sessions().await?;
    if purged > 0 {
        tracing::info!("Purged {} expired sessions", purged);
    }

    // Outbound clients
    let geocode = GeocodeClient::new(&config.geocode_url);
    let facts = FactsClient::new(&config.facts_url, config.facts_api_key.clone());

    // Create application state
    let state = AppState {
        repo,
        geocode,
        facts,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clones for the auth layer
    let repo = state.repo.clone();
    let admin_email = state.config.admin_email.clone();

    // Routes requiring a valid session
    let protected_routes = Router::new()
        // Session
        .route("/auth/logout", post(api::logout))
        .route("/auth/me", get(api::me))
        // Board
        .route("/board", get(api::get_board))
        // Birthdays
        .route("/birthdays", get(api::list_birthdays))
        .route("/birthdays", post(api::create_birthday))
        .route("/birthdays/{id}", get(api::get_birthday))
        .route("/birthdays/{id}", put(api::update_birthday))
        .route("/birthdays/{id}", delete(api::delete_birthday))
        .route("/birthdays/{id}/facts", get(api::get_facts))
        // Apply session auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::session_auth_layer(repo.clone(), admin_email.clone(), req, next)
        }));

    let api_routes = Router::new()
        .route("/auth/register", post(api::register))
        .route("/auth/login", post(api::login))
        .merge(protected_routes);

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
