use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use rounds_shared::errors::{AppError, AppResult, ErrorCode};
use rounds_shared::middleware::AdminUser;
use rounds_shared::types::api::ApiResponse;

use crate::events::publisher;
use crate::models::Profile;
use crate::schema::profiles;
use crate::AppState;

/// POST /admin/profiles/:id/verify
/// Mark a profile as a verified medical professional. The notification
/// service picks up the published event and informs the member.
pub async fn verify_profile(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let profile = profiles::table
        .filter(profiles::id.eq(id))
        .filter(profiles::deleted_at.is_null())
        .first::<Profile>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;

    if profile.is_verified {
        return Err(AppError::new(ErrorCode::AlreadyVerified, "profile is already verified"));
    }

    let updated = diesel::update(profiles::table.filter(profiles::id.eq(id)))
        .set((
            profiles::is_verified.eq(true),
            profiles::updated_at.eq(Utc::now()),
        ))
        .get_result::<Profile>(&mut conn)?;

    publisher::publish_profile_verified(&state.rabbitmq, updated.id, true).await;

    tracing::info!(profile_id = %id, admin_id = %admin.id, "profile verified");

    Ok(Json(ApiResponse::ok(updated)))
}

#[derive(Debug, Deserialize)]
pub struct BanRequest {
    pub banned: bool,
}

/// POST /admin/profiles/:id/ban
/// Set or lift the ban flag. Banned profiles drop out of the eligible pool.
pub async fn ban_profile(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<BanRequest>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let updated = diesel::update(
        profiles::table
            .filter(profiles::id.eq(id))
            .filter(profiles::deleted_at.is_null()),
    )
    .set((
        profiles::is_banned.eq(req.banned),
        profiles::updated_at.eq(Utc::now()),
    ))
    .get_result::<Profile>(&mut conn)
    .map_err(|e| match e {
        diesel::result::Error::NotFound => {
            AppError::new(ErrorCode::ProfileNotFound, "profile not found")
        }
        other => AppError::Database(other),
    })?;

    publisher::publish_profile_banned(&state.rabbitmq, updated.id, req.banned).await;

    tracing::info!(
        profile_id = %id,
        admin_id = %admin.id,
        banned = req.banned,
        "profile ban flag updated"
    );

    Ok(Json(ApiResponse::ok(updated)))
}
