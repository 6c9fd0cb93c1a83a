use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use rounds_shared::errors::{AppError, AppResult, ErrorCode};
use rounds_shared::types::api::ApiResponse;
use rounds_shared::types::auth::AuthUser;

use crate::events::publisher;
use crate::models::{Interest, Profile, PublicProfile, UpdateProfile};
use crate::schema::profiles;
use crate::AppState;

fn find_own_profile(
    conn: &mut diesel::pg::PgConnection,
    credential_id: Uuid,
) -> AppResult<Profile> {
    let profile = profiles::table
        .filter(profiles::credential_id.eq(credential_id))
        .filter(profiles::deleted_at.is_null())
        .first::<Profile>(conn)
        .map_err(|_| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;
    Ok(profile)
}

// --- GET /me ---

pub async fn get_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let profile = find_own_profile(&mut conn, user.id)?;
    Ok(Json(ApiResponse::ok(profile)))
}

// --- PATCH /me ---

pub async fn update_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateProfile>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    if let Some(age) = payload.age {
        if !(18..=100).contains(&age) {
            return Err(AppError::Validation("age must be between 18 and 100".into()));
        }
    }

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let profile = find_own_profile(&mut conn, user.id)?;

    let updated = diesel::update(profiles::table.filter(profiles::id.eq(profile.id)))
        .set((&payload, profiles::updated_at.eq(Utc::now())))
        .get_result::<Profile>(&mut conn)?;

    publisher::publish_profile_updated(&state.rabbitmq, updated.id).await;

    Ok(Json(ApiResponse::ok(updated)))
}

// --- POST /onboarding ---

#[derive(Debug, Deserialize, Validate)]
pub struct OnboardingRequest {
    #[validate(range(min = 18, max = 100))]
    pub age: i32,
    pub gender: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    pub region: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub nationality: String,
    #[validate(length(min = 1, max = 100))]
    pub medical_specialty: String,
    #[validate(range(min = 0, max = 60))]
    pub years_experience: Option<i32>,
    #[validate(length(max = 20))]
    pub interests: Vec<Interest>,
}

pub async fn complete_onboarding(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<OnboardingRequest>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let profile = find_own_profile(&mut conn, user.id)?;

    let interests_json = serde_json::to_value(&req.interests)
        .map_err(|e| AppError::internal(e.to_string()))?;

    let updated = diesel::update(profiles::table.filter(profiles::id.eq(profile.id)))
        .set((
            profiles::age.eq(req.age),
            profiles::gender.eq(&req.gender),
            profiles::city.eq(&req.city),
            profiles::region.eq(&req.region),
            profiles::nationality.eq(&req.nationality),
            profiles::medical_specialty.eq(&req.medical_specialty),
            profiles::years_experience.eq(req.years_experience),
            profiles::interests.eq(&interests_json),
            profiles::onboarding_completed.eq(true),
            profiles::updated_at.eq(Utc::now()),
        ))
        .get_result::<Profile>(&mut conn)?;

    publisher::publish_onboarding_completed(&state.rabbitmq, updated.id).await;

    tracing::info!(
        profile_id = %updated.id,
        specialty = %req.medical_specialty,
        "onboarding completed"
    );

    Ok(Json(ApiResponse::ok(updated)))
}

// --- GET /profiles/:id --- (public view)

pub async fn get_public_profile(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PublicProfile>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let profile = profiles::table
        .filter(profiles::id.eq(id))
        .filter(profiles::deleted_at.is_null())
        .first::<Profile>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;

    Ok(Json(ApiResponse::ok(PublicProfile::from(profile))))
}

// --- DELETE /me --- (soft delete; the row is never removed)

pub async fn delete_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let profile = find_own_profile(&mut conn, user.id)?;

    diesel::update(profiles::table.filter(profiles::id.eq(profile.id)))
        .set((
            profiles::deleted_at.eq(Some(Utc::now())),
            profiles::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)?;

    tracing::info!(profile_id = %profile.id, "profile soft-deleted");

    Ok(Json(ApiResponse::ok(serde_json::json!({ "deleted": true }))))
}
