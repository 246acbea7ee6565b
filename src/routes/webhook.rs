// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook routes for billing events.

use crate::error::AppError;
use crate::services::billing::{self, SignedDelivery, WebhookError};
use crate::services::subscription::{BillingEvent, BillingOutcome};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Webhook routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/webhooks/billing", post(handle_billing_event))
}

#[derive(Serialize)]
struct WebhookAck {
    received: bool,
    applied: bool,
}

fn header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, WebhookError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or(WebhookError::MissingHeader(name))
}

fn verify_delivery(
    secret: &str,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), WebhookError> {
    let delivery = SignedDelivery {
        id: header(headers, "webhook-id")?,
        timestamp: header(headers, "webhook-timestamp")?,
        signatures: header(headers, "webhook-signature")?,
    };
    billing::verify(secret, delivery, body, chrono::Utc::now().timestamp())
}

/// Handle a signed billing event (POST).
///
/// The signature is checked over the raw body before it is parsed.
async fn handle_billing_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(e) = verify_delivery(&state.config.billing_webhook_secret, &headers, &body) {
        tracing::warn!(error = %e, "Security Alert: Rejected billing webhook");
        return AppError::Unauthorized.into_response();
    }

    let event: BillingEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed billing webhook payload");
            return AppError::BadRequest(format!("Invalid event payload: {}", e)).into_response();
        }
    };

    tracing::info!(
        event_type = %event.event_type,
        user_id = %event.data.user_id,
        "Received billing event"
    );

    match state
        .users
        .apply_billing_event(&event, chrono::Utc::now())
        .await
    {
        Ok(outcome) => (
            StatusCode::OK,
            Json(WebhookAck {
                received: true,
                applied: outcome == BillingOutcome::Applied,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
