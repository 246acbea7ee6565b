// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for the signed-in user's profile and account.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::user::{ProfileUpdate, SubscriptionStatus, SubscriptionTier, User};
use crate::services::subscription::{self, Feature};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{delete, get},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me).put(update_me))
        .route("/api/account", delete(delete_account))
}

/// Load (or create on first sign-in) the caller's user document.
pub(crate) async fn load_user(state: &AppState, auth: &AuthUser) -> Result<User> {
    state
        .users
        .get_or_create(&auth.user_id, auth.email.as_deref(), Utc::now())
        .await
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub age: Option<u32>,
    pub weight_kg: Option<f64>,
    /// Tier on record with the billing provider
    pub subscription_tier: SubscriptionTier,
    pub subscription_status: SubscriptionStatus,
    /// Tier actually granted right now (lapsed trials count as free)
    pub effective_tier: SubscriptionTier,
    pub trial_ends_at: Option<String>,
    pub subscription_ends_at: Option<String>,
    pub features: Vec<Feature>,
    /// Maximum custom templates; absent when unlimited
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub template_limit: Option<usize>,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let effective_tier = subscription::effective_tier(&user, Utc::now());
        Self {
            user_id: user.user_id,
            email: user.email,
            name: user.name,
            age: user.age,
            weight_kg: user.weight_kg,
            subscription_tier: user.subscription_tier,
            subscription_status: user.subscription_status,
            effective_tier,
            trial_ends_at: user.trial_ends_at,
            subscription_ends_at: user.subscription_ends_at,
            features: subscription::features_for(effective_tier),
            template_limit: subscription::template_limit(effective_tier),
            created_at: user.created_at,
        }
    }
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let profile = load_user(&state, &user).await?;
    Ok(Json(profile.into()))
}

/// Edit profile fields (name, age, body weight).
async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<UserResponse>> {
    let Json(update) = payload?;
    let profile = state
        .users
        .update_profile(&user.user_id, user.email.as_deref(), &update, Utc::now())
        .await?;
    Ok(Json(profile.into()))
}

// ─── Account Deletion ────────────────────────────────────────

/// Response for account deletion.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteAccountResponse {
    pub success: bool,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub deleted_documents: usize,
}

/// Delete the user's account and all associated data.
async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DeleteAccountResponse>> {
    tracing::info!(user_id = %user.user_id, "User-initiated account deletion");

    let deleted_documents = state
        .users
        .delete_account(&user.user_id)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %user.user_id, error = %e, "Account deletion failed");
            e
        })?;

    Ok(Json(DeleteAccountResponse {
        success: true,
        deleted_documents,
    }))
}
