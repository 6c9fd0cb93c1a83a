use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::notifications;

#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = notifications)]
pub struct Notification {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub payload: Option<serde_json::Value>,
    /// Unread while null.
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_unread(&self) -> bool {
        self.read_at.is_none()
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotification {
    pub profile_id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub payload: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unread_until_stamped() {
        let mut n = Notification {
            id: Uuid::new_v4(),
            profile_id: Uuid::new_v4(),
            kind: "group_matched".into(),
            title: "You've been matched".into(),
            message: "hello".into(),
            payload: None,
            read_at: None,
            created_at: Utc::now(),
        };
        assert!(n.is_unread());

        n.read_at = Some(Utc::now());
        assert!(!n.is_unread());
    }
}
