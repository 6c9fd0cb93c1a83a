use axum::extract::{Path, State};
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use rounds_shared::errors::{AppError, AppResult};

use crate::models::{Interest, NewProfile, Profile};
use crate::schema::profiles;
use crate::AppState;

/// Matching-input slice of a profile, consumed by the matching service.
#[derive(Debug, Serialize)]
pub struct EligibleProfile {
    pub id: Uuid,
    pub first_name: String,
    pub age: Option<i32>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub nationality: Option<String>,
    pub medical_specialty: Option<String>,
    pub years_experience: Option<i32>,
    pub interests: Vec<Interest>,
}

impl From<Profile> for EligibleProfile {
    fn from(p: Profile) -> Self {
        let interests = p.interest_list();
        Self {
            id: p.id,
            first_name: p.first_name,
            age: p.age,
            city: p.city,
            region: p.region,
            nationality: p.nationality,
            medical_specialty: p.medical_specialty,
            years_experience: p.years_experience,
            interests,
        }
    }
}

/// GET /internal/profiles/eligible: the weekly matching pool
/// (service-to-service, no auth): verified, not banned, onboarded, not
/// soft-deleted, in insertion order.
pub async fn eligible_profiles(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<EligibleProfile>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let pool: Vec<Profile> = profiles::table
        .filter(profiles::is_verified.eq(true))
        .filter(profiles::is_banned.eq(false))
        .filter(profiles::onboarding_completed.eq(true))
        .filter(profiles::deleted_at.is_null())
        .order(profiles::created_at.asc())
        .load::<Profile>(&mut conn)?;

    tracing::debug!(count = pool.len(), "eligible pool requested");

    Ok(Json(pool.into_iter().map(EligibleProfile::from).collect()))
}

#[derive(Debug, Serialize)]
pub struct ProfileRefResponse {
    pub profile_id: Option<Uuid>,
}

/// GET /internal/profiles/by-credential/:id: resolve an auth subject to a
/// profile id (service-to-service, no auth).
pub async fn profile_by_credential(
    State(state): State<Arc<AppState>>,
    Path(credential_id): Path<Uuid>,
) -> Json<ProfileRefResponse> {
    let mut conn = match state.db.get() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "failed to get db connection for credential lookup");
            return Json(ProfileRefResponse { profile_id: None });
        }
    };

    let profile_id: Option<Uuid> = profiles::table
        .filter(profiles::credential_id.eq(credential_id))
        .filter(profiles::deleted_at.is_null())
        .select(profiles::id)
        .first(&mut conn)
        .optional()
        .unwrap_or(None);

    Json(ProfileRefResponse { profile_id })
}

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub credential_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// POST /internal/profiles: provision a profile row at signup. Called from
/// the managed auth provider's registration webhook. Idempotent on
/// credential_id.
pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProfileRequest>,
) -> AppResult<Json<Profile>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    if let Some(existing) = profiles::table
        .filter(profiles::credential_id.eq(req.credential_id))
        .first::<Profile>(&mut conn)
        .optional()?
    {
        return Ok(Json(existing));
    }

    let profile = diesel::insert_into(profiles::table)
        .values(NewProfile {
            credential_id: req.credential_id,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
        })
        .get_result::<Profile>(&mut conn)?;

    tracing::info!(profile_id = %profile.id, "profile provisioned");

    Ok(Json(profile))
}
