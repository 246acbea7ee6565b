// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie routes.
//!
//! Sign-in itself happens at the identity provider. The frontend hands the
//! resulting token to `/auth/session`, which stores it in an HttpOnly
//! cookie so scripts never need to hold it.

use crate::error::{AppError, Result};
use crate::middleware::auth::{bearer_token, verify_session_token, SESSION_COOKIE};
use crate::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/session", post(create_session))
        .route("/auth/logout", post(logout))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub user_id: String,
    /// When the session cookie expires (ISO 8601)
    pub expires_at: String,
}

/// Exchange a bearer token for a session cookie.
async fn create_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let token = bearer_token(&headers).ok_or(AppError::Unauthorized)?;
    let claims = verify_session_token(&token, &state.config)?;

    let now = chrono::Utc::now();
    let expires_at = chrono::DateTime::from_timestamp(claims.exp as i64, 0)
        .ok_or(AppError::InvalidToken)?;
    let ttl = (expires_at - now).num_seconds().max(0);

    // First sign-in creates the user document.
    state
        .users
        .get_or_create(&claims.sub, claims.email.as_deref(), now)
        .await?;

    tracing::info!(user_id = %claims.sub, ttl, "Session started");

    let cookie = session_cookie(&state.config.frontend_url, token, time::Duration::seconds(ttl));

    Ok((
        jar.add(cookie),
        Json(SessionResponse {
            user_id: claims.sub,
            expires_at: crate::time_utils::format_utc_rfc3339(expires_at),
        }),
    ))
}

/// Clear the session cookie.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (StatusCode, CookieJar) {
    let removal = session_cookie(&state.config.frontend_url, String::new(), time::Duration::ZERO);
    (StatusCode::NO_CONTENT, jar.add(removal))
}

/// Session cookie with attributes shared by creation and removal.
///
/// `Secure` is only set when the frontend is served over HTTPS so local
/// development over plain HTTP keeps working.
fn session_cookie(frontend_url: &str, value: String, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(frontend_url.starts_with("https://"))
        .max_age(max_age)
        .build()
}
