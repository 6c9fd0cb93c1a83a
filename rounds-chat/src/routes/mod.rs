pub mod health;
pub mod internal;
pub mod messages;
pub mod rooms;

use uuid::Uuid;

use rounds_shared::errors::{AppError, AppResult, ErrorCode};

use crate::AppState;

#[derive(Debug, serde::Deserialize)]
struct ProfileRefResponse {
    profile_id: Option<Uuid>,
}

/// Resolve the caller's profile id from their auth subject; room
/// memberships are keyed by profile id.
pub(crate) async fn resolve_profile_id(state: &AppState, credential_id: Uuid) -> AppResult<Uuid> {
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
