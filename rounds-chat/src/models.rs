use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::{chat_rooms, messages, room_members};

// --- ChatRoom ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = chat_rooms)]
pub struct ChatRoom {
    pub id: Uuid,
    pub match_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = chat_rooms)]
pub struct NewChatRoom {
    pub match_id: Uuid,
    pub name: String,
}

// --- RoomMember ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = room_members)]
pub struct RoomMember {
    pub id: Uuid,
    pub room_id: Uuid,
    pub profile_id: Uuid,
    pub joined_at: DateTime<Utc>,
    pub last_read_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = room_members)]
pub struct NewRoomMember {
    pub room_id: Uuid,
    pub profile_id: Uuid,
}

// --- Message ---

/// A null sender marks a system message (e.g. the welcome line written at
/// room creation).
#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = messages)]
pub struct Message {
    pub id: Uuid,
    pub room_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub content: String,
    pub is_flagged: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessage {
    pub room_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub content: String,
}
