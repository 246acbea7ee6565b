// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise log routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::exercise::{ExerciseCategory, ExerciseEntry, ExerciseInput, SetRecord};
use crate::models::PersonalRecordCheck;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/exercises", get(list_exercises).post(log_exercise))
        .route(
            "/api/exercises/{id}",
            get(get_exercise).put(update_exercise).delete(delete_exercise),
        )
}

/// A logged exercise as returned by the API.
#[derive(Serialize, Clone, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExerciseResponse {
    pub id: String,
    pub name: String,
    pub category: ExerciseCategory,
    pub sets: Vec<SetRecord>,
    pub duration_minutes: Option<f64>,
    pub performed_at: String,
    pub notes: Option<String>,
    pub total_reps: u32,
    pub max_weight: f64,
    pub volume: f64,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<ExerciseEntry> for ExerciseResponse {
    fn from(entry: ExerciseEntry) -> Self {
        Self {
            total_reps: entry.total_reps(),
            max_weight: entry.max_weight(),
            volume: entry.volume(),
            performed_at: format_utc_rfc3339(entry.performed_at),
            id: entry.id,
            name: entry.name,
            category: entry.category,
            sets: entry.sets,
            duration_minutes: entry.duration_minutes,
            notes: entry.notes,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

// ─── Listing ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct ExercisesQuery {
    category: Option<ExerciseCategory>,
    /// Pagination: page number (1-indexed)
    #[serde(default = "default_page")]
    page: u32,
    /// Pagination: items per page
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn default_page() -> u32 {
    1
}
fn default_per_page() -> u32 {
    50
}

const MAX_PER_PAGE: u32 = 100;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExercisesResponse {
    pub exercises: Vec<ExerciseResponse>,
    pub page: u32,
    pub per_page: u32,
    pub has_more: bool,
}

/// List the user's exercises, newest first.
async fn list_exercises(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<ExercisesQuery>, QueryRejection>,
) -> Result<Json<ExercisesResponse>> {
    let Query(params) = query?;

    if params.page < 1 {
        return Err(AppError::BadRequest(
            "Page must be greater than 0".to_string(),
        ));
    }
    if params.per_page < 1 {
        return Err(AppError::BadRequest(
            "per_page must be greater than 0".to_string(),
        ));
    }

    let limit = params.per_page.min(MAX_PER_PAGE);
    let offset = (params.page - 1)
        .checked_mul(limit)
        .ok_or_else(|| AppError::BadRequest("Page number causes overflow".to_string()))?;

    tracing::debug!(
        user_id = %user.user_id,
        category = ?params.category,
        page = params.page,
        "Fetching exercises"
    );

    // Fetch one extra item to determine if another page is available.
    let mut entries = state
        .db
        .get_exercises_for_user(&user.user_id, params.category, limit.saturating_add(1), offset)
        .await?;

    let has_more = entries.len() > limit as usize;
    entries.truncate(limit as usize);

    Ok(Json(ExercisesResponse {
        exercises: entries.into_iter().map(ExerciseResponse::from).collect(),
        page: params.page,
        per_page: limit,
        has_more,
    }))
}

// ─── Logging & Editing ───────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LogExerciseResponse {
    pub exercise: ExerciseResponse,
    pub personal_record: PersonalRecordCheck,
}

/// Log a new exercise.
async fn log_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<ExerciseInput>, JsonRejection>,
) -> Result<(StatusCode, Json<LogExerciseResponse>)> {
    let Json(input) = payload?;
    let logged = state
        .exercises
        .log_exercise(&user.user_id, &input, chrono::Utc::now())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LogExerciseResponse {
            exercise: logged.entry.into(),
            personal_record: logged.personal_record,
        }),
    ))
}

async fn get_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ExerciseResponse>> {
    let entry = state.exercises.get_exercise(&user.user_id, &id).await?;
    Ok(Json(entry.into()))
}

async fn update_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<ExerciseInput>, JsonRejection>,
) -> Result<Json<ExerciseResponse>> {
    let Json(input) = payload?;
    let entry = state
        .exercises
        .update_exercise(&user.user_id, &id, &input, chrono::Utc::now())
        .await?;
    Ok(Json(entry.into()))
}

async fn delete_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.exercises.delete_exercise(&user.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
