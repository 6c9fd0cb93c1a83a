use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::profiles;

// --- Profile ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = profiles)]
pub struct Profile {
    pub id: Uuid,
    pub credential_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub nationality: Option<String>,
    pub medical_specialty: Option<String>,
    pub years_experience: Option<i32>,
    pub interests: serde_json::Value,
    pub is_verified: bool,
    pub is_banned: bool,
    pub onboarding_completed: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn interest_list(&self) -> Vec<Interest> {
        serde_json::from_value(self.interests.clone()).unwrap_or_default()
    }

    /// Eligibility for the weekly matching pool.
    pub fn is_eligible(&self) -> bool {
        self.is_verified
            && !self.is_banned
            && self.onboarding_completed
            && self.deleted_at.is_none()
    }
}

/// Tagged interest, e.g. kind="sport", value="Running".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interest {
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = profiles)]
pub struct NewProfile {
    pub credential_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, AsChangeset, Deserialize, Default)]
#[diesel(table_name = profiles)]
pub struct UpdateProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub nationality: Option<String>,
    pub medical_specialty: Option<String>,
    pub years_experience: Option<i32>,
    pub interests: Option<serde_json::Value>,
}

/// Public view: what other members see of a profile.
#[derive(Debug, Serialize)]
pub struct PublicProfile {
    pub id: Uuid,
    pub first_name: String,
    pub city: Option<String>,
    pub nationality: Option<String>,
    pub medical_specialty: Option<String>,
    pub interests: Vec<Interest>,
    pub is_verified: bool,
}

impl From<Profile> for PublicProfile {
    fn from(p: Profile) -> Self {
        let interests = p.interest_list();
        Self {
            id: p.id,
            first_name: p.first_name,
            city: p.city,
            nationality: p.nationality,
            medical_specialty: p.medical_specialty,
            interests,
            is_verified: p.is_verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            id: Uuid::new_v4(),
            credential_id: Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: "Nkemelu".into(),
            email: "ada@example.com".into(),
            age: Some(34),
            gender: None,
            city: Some("Boston".into()),
            region: None,
            nationality: None,
            medical_specialty: Some("Cardiology".into()),
            years_experience: None,
            interests: serde_json::json!([{"kind": "sport", "value": "Running"}]),
            is_verified: true,
            is_banned: false,
            onboarding_completed: true,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn interest_list_parses_jsonb() {
        let p = profile();
        assert_eq!(
            p.interest_list(),
            vec![Interest { kind: "sport".into(), value: "Running".into() }]
        );
    }

    #[test]
    fn malformed_interests_degrade_to_empty() {
        let mut p = profile();
        p.interests = serde_json::json!({"not": "a list"});
        assert!(p.interest_list().is_empty());
    }

    #[test]
    fn eligibility_requires_all_flags() {
        let p = profile();
        assert!(p.is_eligible());

        let mut unverified = profile();
        unverified.is_verified = false;
        assert!(!unverified.is_eligible());

        let mut banned = profile();
        banned.is_banned = true;
        assert!(!banned.is_eligible());

        let mut incomplete = profile();
        incomplete.onboarding_completed = false;
        assert!(!incomplete.is_eligible());

        let mut deleted = profile();
        deleted.deleted_at = Some(Utc::now());
        assert!(!deleted.is_eligible());
    }

    #[test]
    fn public_view_hides_email() {
        let view = PublicProfile::from(profile());
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("email").is_none());
        assert!(json.get("credential_id").is_none());
    }
}
