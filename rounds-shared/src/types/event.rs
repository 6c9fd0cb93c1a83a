use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RabbitMQ event envelope wrapping all domain events.
///
/// Routing key format: `rounds.{domain}.{entity}.{action}`
/// Example: `rounds.matching.group.created`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event<T: Serialize> {
    pub id: Uuid,
    pub source: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Option<Uuid>,
    pub profile_id: Option<Uuid>,
    pub data: T,
}

impl<T: Serialize> Event<T> {
    pub fn new(source: impl Into<String>, event_type: impl Into<String>, data: T) -> Self {
        Self {
            id: Uuid::now_v7(),
            source: source.into(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            correlation_id: None,
            profile_id: None,
            data,
        }
    }

    pub fn with_profile(mut self, profile_id: Uuid) -> Self {
        self.profile_id = Some(profile_id);
        self
    }

    pub fn with_correlation(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

/// RabbitMQ routing keys
pub mod routing_keys {
    // Profile events
    pub const PROFILE_UPDATED: &str = "rounds.profile.profile.updated";
    pub const PROFILE_VERIFIED: &str = "rounds.profile.profile.verified";
    pub const PROFILE_BANNED: &str = "rounds.profile.profile.banned";
    pub const PROFILE_ONBOARDING_COMPLETED: &str = "rounds.profile.onboarding.completed";

    // Matching events
    pub const MATCHING_GROUP_CREATED: &str = "rounds.matching.group.created";
    pub const MATCHING_RUN_COMPLETED: &str = "rounds.matching.run.completed";

    // Chat events
    pub const CHAT_MESSAGE_SENT: &str = "rounds.chat.message.sent";
}

/// Common event data payloads
pub mod payloads {
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ProfileUpdated {
        pub profile_id: Uuid,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ProfileVerified {
        pub profile_id: Uuid,
        pub verified: bool,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ProfileBanned {
        pub profile_id: Uuid,
        pub banned: bool,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct OnboardingCompleted {
        pub profile_id: Uuid,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct GroupCreated {
        pub match_id: Uuid,
        pub group_name: String,
        pub match_week: String,
        pub member_ids: Vec<Uuid>,
        pub average_compatibility: i32,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct RunCompleted {
        pub profiles_processed: i32,
        pub matches_created: i32,
        pub execution_time_ms: i64,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MessageSent {
        pub message_id: Uuid,
        pub room_id: Uuid,
        pub sender_id: Option<Uuid>,
        pub content_preview: String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_with_data() {
        let event = Event::new(
            "rounds-matching",
            routing_keys::MATCHING_GROUP_CREATED,
            payloads::GroupCreated {
                match_id: Uuid::new_v4(),
                group_name: "Cardiology Group 1".into(),
                match_week: "2026-W35".into(),
                member_ids: vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()],
                average_compatibility: 74,
            },
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], routing_keys::MATCHING_GROUP_CREATED);
        assert_eq!(json["data"]["member_ids"].as_array().unwrap().len(), 3);
    }
}
