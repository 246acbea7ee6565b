// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Secrets (session signing key, billing webhook secret) are injected as
//! environment variables by the deployment and cached for the process
//! lifetime.

use std::env;

/// Largest accepted UTC offset in minutes (UTC+14:00 / UTC-14:00).
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL (allowed CORS origin)
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Expected `iss` claim on session tokens, if the identity provider sets one
    pub session_issuer: Option<String>,
    /// Calendar-day offset used when a request does not carry `tz_offset`
    pub default_utc_offset_minutes: i32,
    /// Exercise library catalog file
    pub exercise_library_path: String,
    /// Pre-built workout templates file
    pub prebuilt_templates_path: String,

    // --- Secrets ---
    /// HS256 key shared with the identity provider (raw bytes)
    pub session_signing_key: Vec<u8>,
    /// Billing webhook signing secret (`whsec_` + base64)
    pub billing_webhook_secret: String,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let default_utc_offset_minutes = match env::var("DEFAULT_UTC_OFFSET_MINUTES") {
            Ok(raw) => {
                let minutes: i32 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("DEFAULT_UTC_OFFSET_MINUTES"))?;
                if minutes.abs() > MAX_UTC_OFFSET_MINUTES {
                    return Err(ConfigError::Invalid("DEFAULT_UTC_OFFSET_MINUTES"));
                }
                minutes
            }
            Err(_) => 0,
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            session_issuer: env::var("SESSION_ISSUER")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            default_utc_offset_minutes,
            exercise_library_path: env::var("EXERCISE_LIBRARY_PATH")
                .unwrap_or_else(|_| "data/exercise_library.json".to_string()),
            prebuilt_templates_path: env::var("PREBUILT_TEMPLATES_PATH")
                .unwrap_or_else(|_| "data/prebuilt_templates.json".to_string()),

            session_signing_key: env::var("SESSION_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("SESSION_SIGNING_KEY"))?
                .into_bytes(),
            billing_webhook_secret: env::var("BILLING_WEBHOOK_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("BILLING_WEBHOOK_SECRET"))?,
        })
    }

    /// Config for tests (no environment access).
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            session_issuer: None,
            default_utc_offset_minutes: 0,
            exercise_library_path: "data/exercise_library.json".to_string(),
            prebuilt_templates_path: "data/prebuilt_templates.json".to_string(),
            session_signing_key: b"test_session_key_32_bytes_min!!!".to_vec(),
            // base64("test_webhook_secret_bytes")
            billing_webhook_secret: "whsec_dGVzdF93ZWJob29rX3NlY3JldF9ieXRlcw==".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
