use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use rounds_shared::errors::{AppError, AppResult};

use crate::models::{ChatRoom, NewChatRoom, NewMessage, NewRoomMember};
use crate::schema::{chat_rooms, messages, room_members};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub match_id: Uuid,
    pub name: String,
    pub member_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CreateRoomResponse {
    pub ok: bool,
    pub room_id: Uuid,
}

/// POST /internal/rooms: create the chat room for a freshly assembled
/// match (service-to-service, no auth). Room, memberships, and a system
/// welcome message land in one transaction so the assembler sees
/// all-or-nothing.
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRoomRequest>,
) -> AppResult<Json<CreateRoomResponse>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let room: ChatRoom = conn.transaction(|conn| {
        let room: ChatRoom = diesel::insert_into(chat_rooms::table)
            .values(NewChatRoom {
                match_id: req.match_id,
                name: req.name.clone(),
            })
            .get_result(conn)?;

        let members: Vec<NewRoomMember> = req
            .member_ids
            .iter()
            .map(|&profile_id| NewRoomMember {
                room_id: room.id,
                profile_id,
            })
            .collect();

        diesel::insert_into(room_members::table)
            .values(&members)
            .execute(conn)?;

        // System welcome line; null sender marks it as not member-authored.
        diesel::insert_into(messages::table)
            .values(NewMessage {
                room_id: room.id,
                sender_id: None,
                content: format!(
                    "Welcome to {}! You were matched for this week - say hello.",
                    req.name
                ),
            })
            .execute(conn)?;

        Ok::<_, diesel::result::Error>(room)
    })?;

    tracing::info!(
        room_id = %room.id,
        match_id = %req.match_id,
        members = req.member_ids.len(),
        "chat room created for match"
    );

    Ok(Json(CreateRoomResponse { ok: true, room_id: room.id }))
}
