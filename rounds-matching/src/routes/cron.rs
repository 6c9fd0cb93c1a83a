use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use diesel::prelude::*;
use serde::Serialize;

use rounds_shared::errors::{AppError, AppResult, ErrorCode};
use rounds_shared::types::api::ApiResponse;

use crate::matching::runner::{self, RunOutcome};
use crate::models::{MatchStatus, MatchingLog};
use crate::schema::{matches, matching_logs};
use crate::AppState;

/// The external scheduler authenticates with a shared secret header.
fn verify_cron_secret(state: &AppState, headers: &HeaderMap) -> AppResult<()> {
    let provided = headers
        .get("x-cron-secret")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCronSecret, "missing x-cron-secret header"))?;

    if provided != state.config.cron_secret {
        return Err(AppError::new(ErrorCode::InvalidCronSecret, "invalid cron secret"));
    }

    Ok(())
}

#[derive(Debug, Serialize)]
pub struct WeeklyMatchingResponse {
    pub success: bool,
    pub message: String,
    pub matches: Vec<runner::CreatedMatch>,
    pub stats: runner::RunStats,
}

/// POST /cron/weekly-matching
/// Trigger one assembler run. Re-triggering against an unchanged pool
/// creates duplicate groups; the scheduler is expected to fire once a week.
pub async fn trigger_weekly_matching(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<Json<WeeklyMatchingResponse>> {
    verify_cron_secret(&state, &headers)?;

    let RunOutcome { message, matches, stats } = runner::run_weekly_matching(&state).await?;

    Ok(Json(WeeklyMatchingResponse {
        success: true,
        message,
        matches,
        stats,
    }))
}

#[derive(Debug, Serialize)]
pub struct MatchingStatusResponse {
    pub last_run: Option<MatchingLog>,
    pub active_matches: i64,
}

/// GET /cron/weekly-matching
/// Report the latest audit-log entry and the active match count. Never
/// triggers a run.
pub async fn matching_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<Json<ApiResponse<MatchingStatusResponse>>> {
    verify_cron_secret(&state, &headers)?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let last_run: Option<MatchingLog> = matching_logs::table
        .order(matching_logs::created_at.desc())
        .first::<MatchingLog>(&mut conn)
        .optional()?;

    let active_matches: i64 = matches::table
        .filter(matches::status.eq(MatchStatus::Active.as_str()))
        .count()
        .get_result(&mut conn)?;

    Ok(Json(ApiResponse::ok(MatchingStatusResponse {
        last_run,
        active_matches,
    })))
}
