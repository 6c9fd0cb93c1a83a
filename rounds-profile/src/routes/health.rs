use axum::Json;
use rounds_shared::types::api::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy("rounds-profile", env!("CARGO_PKG_VERSION")))
}
