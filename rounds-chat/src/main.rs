use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod events;
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
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rounds_shared::middleware::init_tracing("rounds-chat");

    let config = AppConfig::load()?;
    let port = config.port;

    // Set JWT_SECRET env var for the auth extractor middleware
    std::env::set_var("JWT_SECRET", &config.jwt_secret);

    let db = create_pool(&config.database_url)?;
    let rabbitmq = RabbitMqClient::connect(&config.rabbitmq_url).await?;

    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;

    let state = Arc::new(AppState { db, config, rabbitmq, http });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/rooms", get(routes::rooms::my_rooms))
        .route(
            "/rooms/:id/messages",
            get(routes::messages::list_messages).post(routes::messages::send_message),
        )
        .route("/messages/:id", delete(routes::messages::delete_message))
        .route("/messages/:id/flag", post(routes::messages::flag_message))
        // Internal service-to-service endpoints (no auth)
        .route("/internal/rooms", post(routes::internal::create_room))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "rounds-chat starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
