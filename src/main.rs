//! kennel-match server entry point.
//!
//! Starts the Axum HTTP server for the breeding matchmaking core.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use kennel_match::api;
use kennel_match::app_state::AppState;
use kennel_match::config::MatchConfig;
use kennel_match::domain::{DogRegistry, EventBus, MatchRegistry};
use kennel_match::persistence::{PostgresPersistence, Recorder, RecorderSettings};
use kennel_match::service::{DogService, MatchService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = MatchConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting kennel-match");

    // Build domain layer
    let dogs = Arc::new(DogRegistry::new());
    let matches = Arc::new(MatchRegistry::new());
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Restore durable state and start the recorder when persistence is on
    if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;

        let recorder = Arc::new(Recorder::new(
            PostgresPersistence::new(pool),
            Arc::clone(&dogs),
            Arc::clone(&matches),
            RecorderSettings {
                snapshot_interval_secs: config.snapshot_interval_secs,
                event_log_enabled: config.event_log_enabled,
                cleanup_after_days: config.cleanup_after_days,
            },
        ));
        let (dogs_restored, matches_restored) = recorder.restore().await?;
        tracing::info!(dogs_restored, matches_restored, "registries restored from snapshots");
        recorder.spawn(&event_bus);
    }

    // Build service layer
    let dog_service = Arc::new(DogService::new(Arc::clone(&dogs)));
    let match_service = Arc::new(MatchService::new(dogs, matches, event_bus.clone()));

    // Build application state
    let app_state = AppState {
        dog_service,
        match_service,
        event_bus,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
