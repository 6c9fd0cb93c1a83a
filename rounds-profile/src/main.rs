use axum::routing::{get, post};
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
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rounds_shared::middleware::init_tracing("rounds-profile");

    let config = AppConfig::load()?;
    let port = config.port;

    // Set JWT_SECRET env var for the auth extractor middleware
    std::env::set_var("JWT_SECRET", &config.jwt_secret);

    let db = create_pool(&config.database_url)?;
    let rabbitmq = RabbitMqClient::connect(&config.rabbitmq_url).await?;

    let state = Arc::new(AppState { db, config, rabbitmq });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/me",
            get(routes::profile::get_profile)
                .patch(routes::profile::update_profile)
                .delete(routes::profile::delete_profile),
        )
        .route("/onboarding", post(routes::profile::complete_onboarding))
        .route("/profiles/:id", get(routes::profile::get_public_profile))
        // Admin endpoints
        .route("/admin/profiles/:id/verify", post(routes::admin::verify_profile))
        .route("/admin/profiles/:id/ban", post(routes::admin::ban_profile))
        // Internal service-to-service endpoints (no auth)
        .route("/internal/profiles", post(routes::internal::create_profile))
        .route("/internal/profiles/eligible", get(routes::internal::eligible_profiles))
        .route(
            "/internal/profiles/by-credential/:id",
            get(routes::internal::profile_by_credential),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "rounds-profile starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
