// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout template routes.
//!
//! Pre-built templates come from the in-memory catalog and are read-only.
//! User templates live in Firestore and count against the tier's quota.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::exercise::clean_optional;
use crate::models::template::{TemplateInput, WorkoutTemplate};
use crate::routes::api::load_user;
use crate::services::subscription;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/templates", get(list_templates).post(create_template))
        .route(
            "/api/templates/{id}",
            get(get_template).put(update_template).delete(delete_template),
        )
        .route("/api/templates/{id}/use", post(use_template))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TemplatesResponse {
    pub prebuilt: Vec<WorkoutTemplate>,
    pub custom: Vec<WorkoutTemplate>,
    /// Maximum custom templates; absent when unlimited
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub limit: Option<usize>,
}

/// Pre-built templates plus the caller's own.
async fn list_templates(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TemplatesResponse>> {
    let profile = load_user(&state, &user).await?;
    let tier = subscription::effective_tier(&profile, Utc::now());
    let custom = state.db.get_templates_for_user(&user.user_id).await?;

    Ok(Json(TemplatesResponse {
        prebuilt: state.catalog.prebuilt_templates().to_vec(),
        custom,
        limit: subscription::template_limit(tier),
    }))
}

/// Create a user template, subject to the tier's quota.
async fn create_template(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<TemplateInput>, JsonRejection>,
) -> Result<(StatusCode, Json<WorkoutTemplate>)> {
    let Json(input) = payload?;
    input.validate()?;

    let now = Utc::now();
    let profile = load_user(&state, &user).await?;
    let tier = subscription::effective_tier(&profile, now);
    let owned = state.db.count_templates_for_user(&user.user_id).await?;
    subscription::check_template_quota(tier, owned)?;

    let now = format_utc_rfc3339(now);
    let template = WorkoutTemplate {
        id: uuid::Uuid::new_v4().to_string(),
        owner_id: Some(user.user_id.clone()),
        name: input.name.trim().to_string(),
        description: clean_optional(input.description.as_deref()),
        exercises: input.exercises,
        is_prebuilt: false,
        usage_count: 0,
        last_used_at: None,
        created_at: now.clone(),
        updated_at: now,
    };
    state.db.set_template(&template).await?;

    tracing::info!(
        user_id = %user.user_id,
        template_id = %template.id,
        owned = owned + 1,
        "Created template"
    );

    Ok((StatusCode::CREATED, Json(template)))
}

async fn get_template(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<WorkoutTemplate>> {
    if let Some(template) = state.catalog.prebuilt_template(&id) {
        return Ok(Json(template.clone()));
    }

    let template = fetch_user_template(&state, &id).await?;
    if !template.is_visible_to(&user.user_id) {
        return Err(AppError::Forbidden(
            "Template belongs to another user".to_string(),
        ));
    }
    Ok(Json(template))
}

/// Replace the name, description and exercises of an owned template.
async fn update_template(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<TemplateInput>, JsonRejection>,
) -> Result<Json<WorkoutTemplate>> {
    let Json(input) = payload?;
    input.validate()?;
    reject_prebuilt(&state, &id)?;

    let mut template = fetch_user_template(&state, &id).await?;
    template.ensure_editable_by(&user.user_id)?;

    template.name = input.name.trim().to_string();
    template.description = clean_optional(input.description.as_deref());
    template.exercises = input.exercises;
    template.updated_at = format_utc_rfc3339(Utc::now());
    state.db.set_template(&template).await?;

    tracing::info!(user_id = %user.user_id, template_id = %id, "Updated template");
    Ok(Json(template))
}

async fn delete_template(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    reject_prebuilt(&state, &id)?;

    let template = fetch_user_template(&state, &id).await?;
    template.ensure_editable_by(&user.user_id)?;
    state.db.delete_template(&id).await?;

    tracing::info!(user_id = %user.user_id, template_id = %id, "Deleted template");
    Ok(StatusCode::NO_CONTENT)
}

/// Start a workout from a template.
///
/// Usage is only tracked on the caller's own templates; pre-built ones are
/// returned as-is for prefill.
async fn use_template(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<WorkoutTemplate>> {
    if let Some(template) = state.catalog.prebuilt_template(&id) {
        return Ok(Json(template.clone()));
    }

    let mut template = fetch_user_template(&state, &id).await?;
    template.ensure_editable_by(&user.user_id)?;
    template.record_usage(&format_utc_rfc3339(Utc::now()));
    state.db.set_template(&template).await?;

    tracing::debug!(
        user_id = %user.user_id,
        template_id = %id,
        usage_count = template.usage_count,
        "Template used"
    );
    Ok(Json(template))
}

fn reject_prebuilt(state: &AppState, id: &str) -> Result<()> {
    if state.catalog.prebuilt_template(id).is_some() {
        return Err(AppError::Forbidden(
            "Pre-built templates are read-only".to_string(),
        ));
    }
    Ok(())
}

async fn fetch_user_template(state: &AppState, id: &str) -> Result<WorkoutTemplate> {
    state
        .db
        .get_template(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Template {} not found", id)))
}
