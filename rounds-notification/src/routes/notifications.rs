use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use rounds_shared::errors::AppResult;
use rounds_shared::types::api::ApiResponse;
use rounds_shared::types::auth::AuthUser;
use rounds_shared::types::pagination::{Paginated, PaginationParams};

use crate::models::Notification;
use crate::routes::resolve_profile_id;
use crate::services::notification_service;
use crate::AppState;

/// GET /notifications
/// List notifications for the authenticated profile with pagination.
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<Notification>>>> {
    let profile_id = resolve_profile_id(&state, auth_user.id).await?;

    let limit = params.limit() as i64;
    let offset = params.offset() as i64;

    let (items, total) =
        notification_service::list_notifications(&state.db, profile_id, limit, offset)?;

    let paginated = Paginated::new(items, total as u64, &params);
    Ok(Json(ApiResponse::ok(paginated)))
}

#[derive(Debug, serde::Serialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}

/// GET /notifications/unread-count
pub async fn unread_count(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
) -> AppResult<Json<ApiResponse<UnreadCountResponse>>> {
    let profile_id = resolve_profile_id(&state, auth_user.id).await?;
    let count = notification_service::count_unread(&state.db, profile_id)?;

    Ok(Json(ApiResponse::ok(UnreadCountResponse { count })))
}

#[derive(Debug, serde::Serialize)]
pub struct MarkAllReadResponse {
    pub updated: usize,
}

/// POST /notifications/read-all
pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
) -> AppResult<Json<ApiResponse<MarkAllReadResponse>>> {
    let profile_id = resolve_profile_id(&state, auth_user.id).await?;
    let updated = notification_service::mark_all_read(&state.db, profile_id)?;

    Ok(Json(ApiResponse::ok(MarkAllReadResponse { updated })))
}

/// POST /notifications/:id/read
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let profile_id = resolve_profile_id(&state, auth_user.id).await?;
    let notification = notification_service::mark_read(&state.db, id, profile_id)?;

    Ok(Json(ApiResponse::ok(notification)))
}
