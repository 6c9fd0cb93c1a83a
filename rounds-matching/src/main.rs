use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod events;
mod matching;
mod models;
mod routes;
mod schema;

use config::AppConfig;
use rounds_shared::clients::db::{create_pool, DbPool};
use rounds_shared::clients::rabbitmq::RabbitMqClient;

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub rabbitmq: RabbitMqClient,
    pub http: reqwest::Client,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rounds_shared::middleware::init_tracing("rounds-matching");

    let config = AppConfig::load()?;
    let port = config.port;

    // Set JWT_SECRET env var for the auth extractor middleware
    std::env::set_var("JWT_SECRET", &config.jwt_secret);

    let db = create_pool(&config.database_url)?;
    let rabbitmq = RabbitMqClient::connect(&config.rabbitmq_url).await?;
    let metrics_handle = rounds_shared::middleware::init_metrics()?;

    // HTTP client for profile/chat service calls during a run
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let state = Arc::new(AppState {
        db,
        config,
        rabbitmq,
        http,
        metrics_handle,
    });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        // Cron surface: triggered by the external weekly scheduler
        .route(
            "/cron/weekly-matching",
            post(routes::cron::trigger_weekly_matching).get(routes::cron::matching_status),
        )
        // Member-facing match endpoints
        .route("/matches/me", get(routes::matches::my_matches))
        .route("/matches/:id/leave", post(routes::matches::leave_match))
        .route("/matches/:id/status", patch(routes::matches::update_match_status))
        .layer(axum::middleware::from_fn(
            rounds_shared::middleware::metrics_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "rounds-matching starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
