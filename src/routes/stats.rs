// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Statistics routes: overview, personal records, progress charts and
//! two-day comparisons.
//!
//! Everything is computed on request from the user's history. Calendar
//! days are taken in the fixed UTC offset given by `tz_offset` (minutes
//! east of UTC) or the configured default.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::stats::{Comparison, PersonalBest, ProgressSeries, StatsOverview};
use crate::routes::api::load_user;
use crate::services::subscription::{self, Feature, BASIC_PROGRESS_DAYS};
use crate::services::{comparison, progress, records, streaks};
use crate::time_utils::{day_bounds, local_day, parse_day, resolve_offset};
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/stats/overview", get(get_overview))
        .route("/api/stats/records", get(get_records))
        .route("/api/stats/progress", get(get_progress))
        .route("/api/stats/compare", get(get_comparison))
}

const MAX_NAME_LEN: usize = 100;

fn exercise_name(raw: &str) -> Result<&str> {
    let name = raw.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::BadRequest(
            "Invalid 'name' parameter: must be 1-100 characters".to_string(),
        ));
    }
    Ok(name)
}

// ─── Overview ────────────────────────────────────────────────

#[derive(Deserialize)]
struct OverviewQuery {
    tz_offset: Option<i32>,
}

/// Streaks, totals and weekly activity.
async fn get_overview(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<OverviewQuery>, QueryRejection>,
) -> Result<Json<StatsOverview>> {
    let Query(params) = query?;
    let offset = resolve_offset(params.tz_offset, state.config.default_utc_offset_minutes)?;

    let entries = state.db.get_all_exercises_for_user(&user.user_id).await?;
    let overview = streaks::summarize(&entries, Utc::now(), offset);

    tracing::debug!(
        user_id = %user.user_id,
        entries = entries.len(),
        current_streak = overview.current_streak,
        "Computed overview"
    );

    Ok(Json(overview))
}

// ─── Personal Records ────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecordsResponse {
    pub records: Vec<PersonalBest>,
}

/// Best weight and best time for every exercise the user has logged.
async fn get_records(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<RecordsResponse>> {
    let entries = state.db.get_all_exercises_for_user(&user.user_id).await?;
    Ok(Json(RecordsResponse {
        records: records::personal_bests(&entries),
    }))
}

// ─── Progress ────────────────────────────────────────────────

#[derive(Deserialize)]
struct ProgressQuery {
    name: String,
    /// First calendar day to include (YYYY-MM-DD)
    from: Option<String>,
    /// Last calendar day to include (YYYY-MM-DD)
    to: Option<String>,
    tz_offset: Option<i32>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgressResponse {
    #[serde(flatten)]
    pub series: ProgressSeries,
    /// Effective first day (after any history limit)
    pub from: Option<String>,
    pub to: Option<String>,
    /// True when the range was shortened to the tier's history window
    pub history_limited: bool,
}

/// Clamp `from` to the basic history window when the tier lacks full history.
fn limit_history(
    from: Option<NaiveDate>,
    today: NaiveDate,
    full_history: bool,
) -> (Option<NaiveDate>, bool) {
    if full_history {
        return (from, false);
    }
    let earliest = today
        .checked_sub_days(Days::new((BASIC_PROGRESS_DAYS - 1) as u64))
        .unwrap_or(NaiveDate::MIN);
    match from {
        Some(day) if day >= earliest => (Some(day), false),
        _ => (Some(earliest), true),
    }
}

/// Per-day chart series for one exercise.
async fn get_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<ProgressQuery>, QueryRejection>,
) -> Result<Json<ProgressResponse>> {
    let Query(params) = query?;
    let name = exercise_name(&params.name)?;
    let from = params.from.as_deref().map(|d| parse_day(d, "from")).transpose()?;
    let to = params.to.as_deref().map(|d| parse_day(d, "to")).transpose()?;
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(AppError::BadRequest(
                "'from' must not be after 'to'".to_string(),
            ));
        }
    }
    let offset = resolve_offset(params.tz_offset, state.config.default_utc_offset_minutes)?;

    let now = Utc::now();
    let profile = load_user(&state, &user).await?;
    let tier = subscription::effective_tier(&profile, now);
    let (from, history_limited) = limit_history(
        from,
        local_day(now, offset),
        subscription::has_feature(tier, Feature::AdvancedProgress),
    );

    let entries = state
        .db
        .get_exercises_by_name(
            &user.user_id,
            name,
            from.map(|d| day_bounds(d, offset).0),
            to.map(|d| day_bounds(d, offset).1),
        )
        .await?;

    Ok(Json(ProgressResponse {
        series: progress::build_progress_series(name, &entries, offset),
        from: from.map(|d| d.format("%Y-%m-%d").to_string()),
        to: to.map(|d| d.format("%Y-%m-%d").to_string()),
        history_limited,
    }))
}

// ─── Comparison ──────────────────────────────────────────────

#[derive(Deserialize)]
struct CompareQuery {
    name: String,
    first: String,
    second: String,
    tz_offset: Option<i32>,
}

/// Compare the entries for one exercise on two calendar days.
async fn get_comparison(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<CompareQuery>, QueryRejection>,
) -> Result<Json<Comparison>> {
    let Query(params) = query?;
    let name = exercise_name(&params.name)?;
    let first = parse_day(&params.first, "first")?;
    let second = parse_day(&params.second, "second")?;
    let offset = resolve_offset(params.tz_offset, state.config.default_utc_offset_minutes)?;

    let profile = load_user(&state, &user).await?;
    subscription::require_feature(
        subscription::effective_tier(&profile, Utc::now()),
        Feature::WorkoutComparison,
    )?;

    let (first_start, first_end) = day_bounds(first, offset);
    let (second_start, second_end) = day_bounds(second, offset);
    let (mut entries, second_entries) = futures_util::future::try_join(
        state
            .db
            .get_exercises_by_name(&user.user_id, name, Some(first_start), Some(first_end)),
        state
            .db
            .get_exercises_by_name(&user.user_id, name, Some(second_start), Some(second_end)),
    )
    .await?;
    if first != second {
        entries.extend(second_entries);
    }

    Ok(Json(comparison::compare_days(
        name, &entries, first, second, offset,
    )))
}
