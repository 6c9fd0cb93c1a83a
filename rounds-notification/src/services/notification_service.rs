use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use rounds_shared::clients::db::DbPool;
use rounds_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{NewNotification, Notification};
use crate::schema::notifications;

fn get_conn(
    pool: &DbPool,
) -> AppResult<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<PgConnection>>> {
    pool.get().map_err(|e| {
        tracing::error!(error = %e, "failed to get db connection");
        AppError::internal("database connection error")
    })
}

/// Insert a notification row.
pub fn create_notification(pool: &DbPool, new: NewNotification) -> AppResult<Notification> {
    let mut conn = get_conn(pool)?;

    let notification = diesel::insert_into(notifications::table)
        .values(&new)
        .get_result::<Notification>(&mut conn)?;

    Ok(notification)
}

/// List notifications for a profile, newest first, with total count.
pub fn list_notifications(
    pool: &DbPool,
    profile_id: Uuid,
    limit: i64,
    offset: i64,
) -> AppResult<(Vec<Notification>, i64)> {
    let mut conn = get_conn(pool)?;

    let total: i64 = notifications::table
        .filter(notifications::profile_id.eq(profile_id))
        .count()
        .get_result(&mut conn)?;

    let items = notifications::table
        .filter(notifications::profile_id.eq(profile_id))
        .order(notifications::created_at.desc())
        .limit(limit)
        .offset(offset)
        .load::<Notification>(&mut conn)?;

    Ok((items, total))
}

/// Count notifications a profile has not read yet.
pub fn count_unread(pool: &DbPool, profile_id: Uuid) -> AppResult<i64> {
    let mut conn = get_conn(pool)?;

    let count: i64 = notifications::table
        .filter(notifications::profile_id.eq(profile_id))
        .filter(notifications::read_at.is_null())
        .count()
        .get_result(&mut conn)?;

    Ok(count)
}

/// Stamp every unread notification for a profile as read now.
pub fn mark_all_read(pool: &DbPool, profile_id: Uuid) -> AppResult<usize> {
    let mut conn = get_conn(pool)?;

    let updated = diesel::update(
        notifications::table
            .filter(notifications::profile_id.eq(profile_id))
            .filter(notifications::read_at.is_null()),
    )
    .set(notifications::read_at.eq(Utc::now()))
    .execute(&mut conn)?;

    Ok(updated)
}

/// Mark a single notification as read. Only the owning profile can do so;
/// marking an already read notification keeps the original read timestamp.
pub fn mark_read(pool: &DbPool, notification_id: Uuid, profile_id: Uuid) -> AppResult<Notification> {
    let mut conn = get_conn(pool)?;

    let existing = notifications::table
        .filter(notifications::id.eq(notification_id))
        .filter(notifications::profile_id.eq(profile_id))
        .first::<Notification>(&mut conn)
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                AppError::new(ErrorCode::NotificationNotFound, "notification not found")
            }
            other => AppError::Database(other),
        })?;

    if !existing.is_unread() {
        return Ok(existing);
    }

    let notification = diesel::update(notifications::table.filter(notifications::id.eq(notification_id)))
        .set(notifications::read_at.eq(Utc::now()))
        .get_result::<Notification>(&mut conn)?;

    Ok(notification)
}
