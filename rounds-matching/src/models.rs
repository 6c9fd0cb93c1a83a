use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{match_members, matches, matching_logs};

// --- Match (a weekly group) ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = matches)]
pub struct Match {
    pub id: Uuid,
    pub group_name: String,
    pub specialty: String,
    pub match_week: String,
    pub status: String,
    pub average_compatibility: i32,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = matches)]
pub struct NewMatch {
    pub group_name: String,
    pub specialty: String,
    pub match_week: String,
    pub status: String,
    pub average_compatibility: i32,
}

/// Match lifecycle. The assembler only ever creates `Active` matches;
/// everything after that is driven by external status updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Active,
    Completed,
    Archived,
}

impl MatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }

    pub fn can_transition_to(self, next: MatchStatus) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Completed)
                | (Self::Active, Self::Archived)
                | (Self::Completed, Self::Archived)
        )
    }
}

impl std::str::FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            _ => Err(format!("unknown match status: {s}")),
        }
    }
}

// --- MatchMember ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = match_members)]
pub struct MatchMember {
    pub id: Uuid,
    pub match_id: Uuid,
    pub profile_id: Uuid,
    pub compatibility_score: i32,
    pub is_active: bool,
    pub joined_at: DateTime<Utc>,
    pub left_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = match_members)]
pub struct NewMatchMember {
    pub match_id: Uuid,
    pub profile_id: Uuid,
    pub compatibility_score: i32,
}

// --- MatchingLog (per-run audit entry) ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = matching_logs)]
pub struct MatchingLog {
    pub id: Uuid,
    pub algorithm_version: String,
    pub profiles_processed: i32,
    pub matches_created: i32,
    pub execution_time_ms: i64,
    pub success: bool,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = matching_logs)]
pub struct NewMatchingLog {
    pub algorithm_version: String,
    pub profiles_processed: i32,
    pub matches_created: i32,
    pub execution_time_ms: i64,
    pub success: bool,
    pub error_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_transitions() {
        use MatchStatus::*;
        assert!(Active.can_transition_to(Completed));
        assert!(Active.can_transition_to(Archived));
        assert!(Completed.can_transition_to(Archived));
        assert!(!Completed.can_transition_to(Active));
        assert!(!Archived.can_transition_to(Active));
        assert!(!Active.can_transition_to(Active));
    }

    #[test]
    fn status_round_trips() {
        for status in [MatchStatus::Active, MatchStatus::Completed, MatchStatus::Archived] {
            let parsed: MatchStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("pending".parse::<MatchStatus>().is_err());
    }
}
