use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use diesel::dsl::count_star;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use rounds_shared::errors::{AppError, AppResult, ErrorCode};
use rounds_shared::types::api::ApiResponse;
use rounds_shared::types::auth::AuthUser;
use rounds_shared::types::pagination::{Paginated, PaginationParams};

use crate::events::publisher;
use crate::models::{Message, NewMessage};
use crate::schema::{messages, room_members};
use crate::AppState;

const MAX_MESSAGE_LEN: usize = 2000;

/// Trim and check message content: non-empty after trimming, at most 2000
/// characters (not bytes).
fn validate_content(raw: &str) -> AppResult<&str> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyMessage, "message content is empty"));
    }
    if content.chars().count() > MAX_MESSAGE_LEN {
        return Err(AppError::Validation(format!(
            "message exceeds {MAX_MESSAGE_LEN} characters"
        )));
    }
    Ok(content)
}

/// Verify the profile is a member of the given room.
fn verify_membership(
    conn: &mut diesel::pg::PgConnection,
    room_id: Uuid,
    profile_id: Uuid,
) -> AppResult<()> {
    let is_member: bool = room_members::table
        .filter(room_members::room_id.eq(room_id))
        .filter(room_members::profile_id.eq(profile_id))
        .select(count_star())
        .first::<i64>(conn)
        .map(|c| c > 0)?;

    if !is_member {
        return Err(AppError::new(
            ErrorCode::NotRoomMember,
            "you are not a member of this room",
        ));
    }

    Ok(())
}

/// GET /rooms/:id/messages - paginated, newest first, soft-deleted excluded.
pub async fn list_messages(
    auth_user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<Message>>>> {
    let profile_id = super::resolve_profile_id(&state, auth_user.id).await?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    verify_membership(&mut conn, room_id, profile_id)?;

    let total: i64 = messages::table
        .filter(messages::room_id.eq(room_id))
        .filter(messages::deleted_at.is_null())
        .select(count_star())
        .first::<i64>(&mut conn)?;

    let items: Vec<Message> = messages::table
        .filter(messages::room_id.eq(room_id))
        .filter(messages::deleted_at.is_null())
        .order(messages::created_at.desc())
        .offset(params.offset() as i64)
        .limit(params.limit() as i64)
        .load::<Message>(&mut conn)?;

    // Mark the room read up to now.
    diesel::update(
        room_members::table
            .filter(room_members::room_id.eq(room_id))
            .filter(room_members::profile_id.eq(profile_id)),
    )
    .set(room_members::last_read_at.eq(Utc::now()))
    .execute(&mut conn)?;

    Ok(Json(ApiResponse::ok(Paginated::new(items, total as u64, &params))))
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// POST /rooms/:id/messages - append a message. Messages are append-only;
/// removal is a soft delete.
pub async fn send_message(
    auth_user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<Uuid>,
    Json(req): Json<SendMessageRequest>,
) -> AppResult<Json<ApiResponse<Message>>> {
    let content = validate_content(&req.content)?;

    let profile_id = super::resolve_profile_id(&state, auth_user.id).await?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    verify_membership(&mut conn, room_id, profile_id)?;

    let message = diesel::insert_into(messages::table)
        .values(NewMessage {
            room_id,
            sender_id: Some(profile_id),
            content: content.to_string(),
        })
        .get_result::<Message>(&mut conn)?;

    publisher::publish_message_sent(&state.rabbitmq, &message).await;

    Ok(Json(ApiResponse::ok(message)))
}

/// DELETE /messages/:id - sender-only soft delete; the row survives with a
/// deletion timestamp.
pub async fn delete_message(
    auth_user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Message>>> {
    let profile_id = super::resolve_profile_id(&state, auth_user.id).await?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let message: Message = messages::table
        .find(message_id)
        .filter(messages::deleted_at.is_null())
        .first::<Message>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::MessageNotFound, "message not found"))?;

    if message.sender_id != Some(profile_id) {
        return Err(AppError::new(
            ErrorCode::NotMessageSender,
            "only the sender can delete a message",
        ));
    }

    let deleted = diesel::update(messages::table.find(message_id))
        .set(messages::deleted_at.eq(Some(Utc::now())))
        .get_result::<Message>(&mut conn)?;

    Ok(Json(ApiResponse::ok(deleted)))
}

/// POST /messages/:id/flag - any room member can flag a message for review.
pub async fn flag_message(
    auth_user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Message>>> {
    let profile_id = super::resolve_profile_id(&state, auth_user.id).await?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let message: Message = messages::table
        .find(message_id)
        .filter(messages::deleted_at.is_null())
        .first::<Message>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::MessageNotFound, "message not found"))?;

    verify_membership(&mut conn, message.room_id, profile_id)?;

    let flagged = diesel::update(messages::table.find(message_id))
        .set(messages::is_flagged.eq(true))
        .get_result::<Message>(&mut conn)?;

    tracing::info!(
        message_id = %message_id,
        flagged_by = %profile_id,
        "message flagged"
    );

    Ok(Json(ApiResponse::ok(flagged)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_is_trimmed() {
        assert_eq!(validate_content("  hello  ").unwrap(), "hello");
    }

    #[test]
    fn empty_and_whitespace_content_rejected() {
        assert!(validate_content("").is_err());
        assert!(validate_content("   \n\t ").is_err());
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        let ascii = "a".repeat(MAX_MESSAGE_LEN);
        assert!(validate_content(&ascii).is_ok());
        assert!(validate_content(&format!("{ascii}a")).is_err());

        // 2000 two-byte characters still fit.
        let multibyte = "é".repeat(MAX_MESSAGE_LEN);
        assert!(multibyte.len() > MAX_MESSAGE_LEN);
        assert!(validate_content(&multibyte).is_ok());
    }
}
