// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Billing webhook signature verification (Standard Webhooks scheme).
//!
//! The provider signs `"{webhook-id}.{webhook-timestamp}.{body}"` with
//! HMAC-SHA256 using the base64 secret after the `whsec_` prefix, and sends
//! one or more space-separated `v1,<base64 signature>` values.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Maximum clock skew accepted on `webhook-timestamp`, in seconds.
pub const TIMESTAMP_TOLERANCE_SECS: i64 = 5 * 60;

const SECRET_PREFIX: &str = "whsec_";

/// Why a webhook was rejected.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum WebhookError {
    #[error("missing webhook header: {0}")]
    MissingHeader(&'static str),

    #[error("webhook timestamp outside tolerance")]
    StaleTimestamp,

    #[error("no matching webhook signature")]
    BadSignature,

    #[error("webhook secret is not valid base64")]
    InvalidSecret,
}

/// Headers accompanying a signed webhook delivery.
#[derive(Debug, Clone, Copy)]
pub struct SignedDelivery<'a> {
    pub id: &'a str,
    pub timestamp: &'a str,
    pub signatures: &'a str,
}

fn decode_secret(secret: &str) -> Result<Vec<u8>, WebhookError> {
    let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
    STANDARD
        .decode(encoded)
        .map_err(|_| WebhookError::InvalidSecret)
}

fn compute_signature(key: &[u8], id: &str, timestamp: &str, body: &[u8]) -> Result<Vec<u8>, WebhookError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| WebhookError::InvalidSecret)?;
    mac.update(id.as_bytes());
    mac.update(b".");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Sign a payload; used by tests and local tooling to produce deliveries.
pub fn sign(secret: &str, id: &str, timestamp: i64, body: &[u8]) -> Result<String, WebhookError> {
    let key = decode_secret(secret)?;
    let signature = compute_signature(&key, id, &timestamp.to_string(), body)?;
    Ok(format!("v1,{}", STANDARD.encode(signature)))
}

/// Verify a delivery against the shared secret at time `now` (Unix seconds).
pub fn verify(
    secret: &str,
    delivery: SignedDelivery<'_>,
    body: &[u8],
    now: i64,
) -> Result<(), WebhookError> {
    let sent_at: i64 = delivery
        .timestamp
        .trim()
        .parse()
        .map_err(|_| WebhookError::StaleTimestamp)?;
    if now.abs_diff(sent_at) > TIMESTAMP_TOLERANCE_SECS.unsigned_abs() {
        return Err(WebhookError::StaleTimestamp);
    }

    let key = decode_secret(secret)?;
    let expected = compute_signature(&key, delivery.id, delivery.timestamp.trim(), body)?;

    let matched = delivery
        .signatures
        .split_whitespace()
        .filter_map(|candidate| candidate.strip_prefix("v1,"))
        .filter_map(|encoded| STANDARD.decode(encoded).ok())
        .any(|candidate| bool::from(candidate.ct_eq(&expected)));

    if matched {
        Ok(())
    } else {
        Err(WebhookError::BadSignature)
    }
}
