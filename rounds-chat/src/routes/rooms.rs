use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use std::sync::Arc;

use rounds_shared::errors::{AppError, AppResult};
use rounds_shared::types::api::ApiResponse;
use rounds_shared::types::auth::AuthUser;

use crate::models::ChatRoom;
use crate::schema::{chat_rooms, room_members};
use crate::AppState;

/// GET /rooms - the caller's chat rooms, newest first.
pub async fn my_rooms(
    auth_user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<ChatRoom>>>> {
    let profile_id = super::resolve_profile_id(&state, auth_user.id).await?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let rooms: Vec<ChatRoom> = room_members::table
        .inner_join(chat_rooms::table)
        .filter(room_members::profile_id.eq(profile_id))
        .select(chat_rooms::all_columns)
        .order(chat_rooms::created_at.desc())
        .load::<ChatRoom>(&mut conn)?;

    Ok(Json(ApiResponse::ok(rooms)))
}
