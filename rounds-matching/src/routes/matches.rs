use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rounds_shared::errors::{AppError, AppResult, ErrorCode};
use rounds_shared::middleware::AdminUser;
use rounds_shared::types::api::ApiResponse;
use rounds_shared::types::auth::AuthUser;

use crate::models::{Match, MatchMember, MatchStatus};
use crate::schema::{match_members, matches};
use crate::AppState;

#[derive(Debug, Deserialize)]
struct ProfileRefResponse {
    profile_id: Option<Uuid>,
}

/// Resolve the caller's profile id from their auth subject via the profile
/// service (the matching service does not own the profiles table).
async fn resolve_profile_id(state: &AppState, credential_id: Uuid) -> AppResult<Uuid> {
    let url = format!(
        "{}/internal/profiles/by-credential/{credential_id}",
        state.config.profile_service_url
    );
    let resp = state
        .http
        .get(&url)
        .send()
        .await
        .map_err(|e| AppError::internal(format!("profile service unreachable: {e}")))?
        .error_for_status()
        .map_err(|e| AppError::internal(format!("profile service error: {e}")))?
        .json::<ProfileRefResponse>()
        .await
        .map_err(|e| AppError::internal(format!("malformed profile response: {e}")))?;

    resp.profile_id
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))
}

#[derive(Debug, Serialize)]
pub struct MatchWithMembership {
    #[serde(flatten)]
    pub group: Match,
    pub compatibility_score: i32,
    pub is_active_member: bool,
}

/// GET /matches/me - the caller's match history, newest first.
pub async fn my_matches(
    auth_user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<MatchWithMembership>>>> {
    let profile_id = resolve_profile_id(&state, auth_user.id).await?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let rows: Vec<(MatchMember, Match)> = match_members::table
        .inner_join(matches::table)
        .filter(match_members::profile_id.eq(profile_id))
        .order(matches::created_at.desc())
        .load::<(MatchMember, Match)>(&mut conn)?;

    let history = rows
        .into_iter()
        .map(|(membership, group)| MatchWithMembership {
            group,
            compatibility_score: membership.compatibility_score,
            is_active_member: membership.is_active,
        })
        .collect();

    Ok(Json(ApiResponse::ok(history)))
}

/// POST /matches/:id/leave - soft-leave: the membership stays for history,
/// flagged inactive.
pub async fn leave_match(
    auth_user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MatchMember>>> {
    let profile_id = resolve_profile_id(&state, auth_user.id).await?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let membership = diesel::update(
        match_members::table
            .filter(match_members::match_id.eq(match_id))
            .filter(match_members::profile_id.eq(profile_id))
            .filter(match_members::is_active.eq(true)),
    )
    .set((
        match_members::is_active.eq(false),
        match_members::left_at.eq(Some(Utc::now())),
    ))
    .get_result::<MatchMember>(&mut conn)
    .map_err(|e| match e {
        diesel::result::Error::NotFound => {
            AppError::new(ErrorCode::NotMatchMember, "no active membership in this match")
        }
        other => AppError::Database(other),
    })?;

    tracing::info!(match_id = %match_id, profile_id = %profile_id, "member left match");

    Ok(Json(ApiResponse::ok(membership)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// PATCH /matches/:id/status - admin-driven lifecycle transition.
pub async fn update_match_status(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> AppResult<Json<ApiResponse<Match>>> {
    let next: MatchStatus = req
        .status
        .parse()
        .map_err(|e: String| AppError::new(ErrorCode::InvalidStatusTransition, e))?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let current: Match = matches::table
        .find(match_id)
        .first::<Match>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::MatchNotFound, "match not found"))?;

    let current_status: MatchStatus = current
        .status
        .parse()
        .map_err(|e: String| AppError::internal(e))?;

    if !current_status.can_transition_to(next) {
        return Err(AppError::new(
            ErrorCode::InvalidStatusTransition,
            format!("cannot transition from {} to {}", current.status, req.status),
        ));
    }

    let updated = diesel::update(matches::table.find(match_id))
        .set((
            matches::status.eq(next.as_str()),
            matches::last_activity_at.eq(Utc::now()),
        ))
        .get_result::<Match>(&mut conn)?;

    tracing::info!(
        match_id = %match_id,
        admin_id = %admin.id,
        from = %current.status,
        to = %req.status,
        "match status updated"
    );

    Ok(Json(ApiResponse::ok(updated)))
}
