use std::sync::Arc;
use std::time::Instant;

use chrono::{Datelike, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use rounds_shared::errors::{AppError, AppResult};

use crate::events::publisher;
use crate::matching::algorithm::MatchProfile;
use crate::matching::assembler::{assemble_groups, AssembledGroup, MIN_GROUP_SIZE};
use crate::models::{Match, MatchStatus, NewMatch, NewMatchMember, NewMatchingLog};
use crate::schema::{match_members, matches, matching_logs};
use crate::AppState;

pub const ALGORITHM_VERSION: &str = "weighted-v2";

#[derive(Debug, Serialize)]
pub struct CreatedMatch {
    pub id: Uuid,
    pub name: String,
    pub member_count: usize,
    pub average_compatibility: i32,
}

#[derive(Debug, Serialize)]
pub struct RunStats {
    pub total_profiles: usize,
    pub total_matches: usize,
    pub average_group_size: f64,
    pub unmatched_profiles: usize,
}

#[derive(Debug, Serialize)]
pub struct RunOutcome {
    pub message: String,
    pub matches: Vec<CreatedMatch>,
    pub stats: RunStats,
}

/// One full weekly matching run: snapshot the eligible pool, assemble
/// groups, persist each group sequentially, and record a run-level audit
/// entry. Always writes exactly one `matching_logs` row, success or not.
///
/// There is no idempotency key: triggering the run twice against an
/// unchanged pool creates duplicate groups.
pub async fn run_weekly_matching(state: &Arc<AppState>) -> AppResult<RunOutcome> {
    let started = Instant::now();

    match execute_run(state).await {
        Ok((outcome, processed)) => {
            let elapsed_ms = started.elapsed().as_millis() as i64;
            record_run(
                state,
                processed,
                outcome.matches.len() as i32,
                elapsed_ms,
                true,
                None,
            );
            publisher::publish_run_completed(
                &state.rabbitmq,
                processed,
                outcome.matches.len() as i32,
                elapsed_ms,
            )
            .await;
            Ok(outcome)
        }
        Err(e) => {
            tracing::error!(error = %e, "weekly matching run failed");
            record_run(
                state,
                0,
                0,
                started.elapsed().as_millis() as i64,
                false,
                Some(e.to_string()),
            );
            Err(e)
        }
    }
}

async fn execute_run(state: &Arc<AppState>) -> AppResult<(RunOutcome, i32)> {
    let pool = fetch_eligible_pool(state).await?;
    let total_profiles = pool.len();
    tracing::info!(total_profiles, "eligible pool fetched");

    if total_profiles < MIN_GROUP_SIZE {
        return Ok((insufficient_pool_outcome(total_profiles), total_profiles as i32));
    }

    let assembly = assemble_groups(&pool);
    let match_week = current_match_week();

    let mut created = Vec::new();
    for group in &assembly.groups {
        // Best-effort per group: a failed group is skipped, the run goes on.
        match persist_group(state, group, &match_week).await {
            Ok(record) => {
                publisher::publish_group_created(&state.rabbitmq, &record, group).await;
                created.push(CreatedMatch {
                    id: record.id,
                    name: record.group_name.clone(),
                    member_count: group.members.len(),
                    average_compatibility: record.average_compatibility,
                });
            }
            Err(e) => {
                tracing::warn!(group = %group.name, error = %e, "skipping group after persistence failure");
            }
        }
    }

    let total_matches = created.len();
    let matched_members: usize = created.iter().map(|m| m.member_count).sum();
    let average_group_size = if total_matches == 0 {
        0.0
    } else {
        matched_members as f64 / total_matches as f64
    };

    tracing::info!(
        total_profiles,
        total_matches,
        unmatched = total_profiles - matched_members,
        %match_week,
        "weekly matching run completed"
    );

    Ok((
        RunOutcome {
            message: format!("created {total_matches} matches for {match_week}"),
            matches: created,
            stats: RunStats {
                total_profiles,
                total_matches,
                average_group_size,
                unmatched_profiles: total_profiles - matched_members,
            },
        },
        total_profiles as i32,
    ))
}

/// A pool smaller than the minimum group size ends the run early: nobody is
/// matched, the run still counts as a success.
fn insufficient_pool_outcome(total_profiles: usize) -> RunOutcome {
    RunOutcome {
        message: "not enough eligible profiles to assemble groups".into(),
        matches: vec![],
        stats: RunStats {
            total_profiles,
            total_matches: 0,
            average_group_size: 0.0,
            unmatched_profiles: total_profiles,
        },
    }
}

/// Snapshot the eligible pool (verified, not banned, onboarded, not
/// soft-deleted) from the profile service.
async fn fetch_eligible_pool(state: &Arc<AppState>) -> AppResult<Vec<MatchProfile>> {
    let url = format!("{}/internal/profiles/eligible", state.config.profile_service_url);
    let pool = state
        .http
        .get(&url)
        .send()
        .await
        .map_err(|e| AppError::internal(format!("profile service unreachable: {e}")))?
        .error_for_status()
        .map_err(|e| AppError::internal(format!("profile service error: {e}")))?
        .json::<Vec<MatchProfile>>()
        .await
        .map_err(|e| AppError::internal(format!("malformed eligible pool response: {e}")))?;
    Ok(pool)
}

/// Insert the match and its memberships in one transaction, then create the
/// group's chat room. A chat-room failure rolls the group back best-effort
/// so a half-created group never survives the run.
async fn persist_group(
    state: &Arc<AppState>,
    group: &AssembledGroup,
    match_week: &str,
) -> AppResult<Match> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let record: Match = conn.transaction(|conn| {
        let record: Match = diesel::insert_into(matches::table)
            .values(NewMatch {
                group_name: group.name.clone(),
                specialty: group.specialty.clone(),
                match_week: match_week.to_string(),
                status: MatchStatus::Active.as_str().to_string(),
                average_compatibility: group.average_compatibility,
            })
            .get_result(conn)?;

        let members: Vec<NewMatchMember> = group
            .members
            .iter()
            .map(|m| NewMatchMember {
                match_id: record.id,
                profile_id: m.profile_id,
                compatibility_score: m.compatibility_score,
            })
            .collect();

        diesel::insert_into(match_members::table)
            .values(&members)
            .execute(conn)?;

        Ok::<_, diesel::result::Error>(record)
    })?;

    if let Err(e) = create_chat_room(state, &record, group).await {
        rollback_group(&mut conn, record.id);
        return Err(e);
    }

    tracing::debug!(
        match_id = %record.id,
        group = %record.group_name,
        members = group.members.len(),
        avg = record.average_compatibility,
        "group persisted"
    );

    Ok(record)
}

async fn create_chat_room(
    state: &Arc<AppState>,
    record: &Match,
    group: &AssembledGroup,
) -> AppResult<()> {
    let url = format!("{}/internal/rooms", state.config.chat_service_url);
    let member_ids: Vec<Uuid> = group.members.iter().map(|m| m.profile_id).collect();

    let response = state
        .http
        .post(&url)
        .json(&serde_json::json!({
            "match_id": record.id,
            "name": record.group_name,
            "member_ids": member_ids,
        }))
        .send()
        .await
        .map_err(|e| AppError::internal(format!("chat service unreachable: {e}")))?;

    if !response.status().is_success() {
        return Err(AppError::internal(format!(
            "chat room creation failed with status {}",
            response.status()
        )));
    }

    Ok(())
}

fn rollback_group(conn: &mut diesel::PgConnection, match_id: Uuid) {
    let result = conn.transaction(|conn| {
        diesel::delete(match_members::table.filter(match_members::match_id.eq(match_id)))
            .execute(conn)?;
        diesel::delete(matches::table.filter(matches::id.eq(match_id))).execute(conn)
    });
    if let Err(e) = result {
        tracing::error!(match_id = %match_id, error = %e, "failed to roll back half-created group");
    }
}

fn record_run(
    state: &Arc<AppState>,
    profiles_processed: i32,
    matches_created: i32,
    execution_time_ms: i64,
    success: bool,
    error_message: Option<String>,
) {
    let mut conn = match state.db.get() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "failed to get db connection for audit log");
            return;
        }
    };

    let entry = NewMatchingLog {
        algorithm_version: ALGORITHM_VERSION.to_string(),
        profiles_processed,
        matches_created,
        execution_time_ms,
        success,
        error_message,
    };

    if let Err(e) = diesel::insert_into(matching_logs::table)
        .values(&entry)
        .execute(&mut conn)
    {
        tracing::error!(error = %e, "failed to record matching run audit entry");
    }
}

/// ISO week label for the current run, e.g. `2026-W35`.
pub fn current_match_week() -> String {
    let week = Utc::now().iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_pool_matches_nobody_and_reports_it() {
        let outcome = insufficient_pool_outcome(2);
        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.stats.total_profiles, 2);
        assert_eq!(outcome.stats.total_matches, 0);
        assert_eq!(outcome.stats.unmatched_profiles, 2);
        assert_eq!(outcome.stats.average_group_size, 0.0);
        assert!(outcome.message.contains("not enough eligible profiles"));
    }

    #[test]
    fn match_week_label_shape() {
        let label = current_match_week();
        let (year, week) = label.split_once("-W").expect("separator");
        assert_eq!(year.len(), 4);
        assert!(year.parse::<i32>().is_ok());
        assert_eq!(week.len(), 2);
        let week: u32 = week.parse().unwrap();
        assert!((1..=53).contains(&week));
    }
}
