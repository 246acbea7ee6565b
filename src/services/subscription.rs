// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Subscription entitlements and billing-driven state changes.
//!
//! Billing events are plain field updates on the user document; no payment
//! logic lives here.

use crate::error::{AppError, Result};
use crate::models::user::{SubscriptionStatus, SubscriptionTier, User};
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User-created templates allowed on the free tier.
pub const FREE_TEMPLATE_LIMIT: usize = 3;

/// Days of history charted without `AdvancedProgress`.
pub const BASIC_PROGRESS_DAYS: i64 = 90;

/// Tier-gated features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    UnlimitedTemplates,
    WorkoutComparison,
    AdvancedProgress,
}

impl Feature {
    pub const ALL: [Feature; 3] = [
        Feature::UnlimitedTemplates,
        Feature::WorkoutComparison,
        Feature::AdvancedProgress,
    ];

    fn minimum_tier(self) -> SubscriptionTier {
        match self {
            Feature::UnlimitedTemplates | Feature::WorkoutComparison => SubscriptionTier::Premium,
            Feature::AdvancedProgress => SubscriptionTier::Pro,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Feature::UnlimitedTemplates => "Unlimited templates",
            Feature::WorkoutComparison => "Workout comparison",
            Feature::AdvancedProgress => "Full progress history",
        }
    }
}

/// Tier the user is entitled to right now.
///
/// Trials and cancellations keep the paid tier until their end date; an
/// unparseable or missing end date is treated as already lapsed.
pub fn effective_tier(user: &User, now: DateTime<Utc>) -> SubscriptionTier {
    let still_running = |end: Option<&str>| {
        end.and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .is_some_and(|end| end.with_timezone(&Utc) > now)
    };

    match user.subscription_status {
        SubscriptionStatus::Active | SubscriptionStatus::PastDue => user.subscription_tier,
        SubscriptionStatus::Trial if still_running(user.trial_ends_at.as_deref()) => {
            user.subscription_tier
        }
        SubscriptionStatus::Cancelled if still_running(user.subscription_ends_at.as_deref()) => {
            user.subscription_tier
        }
        _ => SubscriptionTier::Free,
    }
}

pub fn has_feature(tier: SubscriptionTier, feature: Feature) -> bool {
    tier >= feature.minimum_tier()
}

/// Features enabled for a tier (for the UI).
pub fn features_for(tier: SubscriptionTier) -> Vec<Feature> {
    Feature::ALL
        .into_iter()
        .filter(|f| has_feature(tier, *f))
        .collect()
}

/// Reject the request unless `tier` includes `feature`.
pub fn require_feature(tier: SubscriptionTier, feature: Feature) -> Result<()> {
    if has_feature(tier, feature) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "{} requires a {} subscription",
            feature.label(),
            tier_label(feature.minimum_tier())
        )))
    }
}

/// Maximum user-created templates, `None` for unlimited.
pub fn template_limit(tier: SubscriptionTier) -> Option<usize> {
    if has_feature(tier, Feature::UnlimitedTemplates) {
        None
    } else {
        Some(FREE_TEMPLATE_LIMIT)
    }
}

/// Reject creating another template once the tier's quota is used up.
pub fn check_template_quota(tier: SubscriptionTier, owned: usize) -> Result<()> {
    match template_limit(tier) {
        Some(limit) if owned >= limit => Err(AppError::LimitExceeded(format!(
            "Free plan allows up to {} custom templates; upgrade to create more",
            limit
        ))),
        _ => Ok(()),
    }
}

fn tier_label(tier: SubscriptionTier) -> &'static str {
    match tier {
        SubscriptionTier::Free => "free",
        SubscriptionTier::Premium => "premium",
        SubscriptionTier::Pro => "pro",
    }
}

// ─── Billing Events ──────────────────────────────────────────

/// Billing webhook event envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: BillingEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BillingEventData {
    /// Our user ID, passed to the billing provider at checkout
    pub user_id: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub tier: Option<SubscriptionTier>,
    #[serde(default)]
    pub trial_ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current_period_end: Option<DateTime<Utc>>,
}

/// Result of applying a billing event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingOutcome {
    Applied,
    Ignored,
}

/// Event types that change subscription state.
pub const HANDLED_EVENTS: [&str; 5] = [
    "subscription.activated",
    "subscription.trial_started",
    "subscription.payment_failed",
    "subscription.cancelled",
    "subscription.expired",
];

pub fn is_handled_event(event_type: &str) -> bool {
    HANDLED_EVENTS.contains(&event_type)
}

/// Apply a billing event to the user as field updates.
pub fn apply_billing_event(
    user: &mut User,
    event: &BillingEvent,
    now: DateTime<Utc>,
) -> Result<BillingOutcome> {
    let data = &event.data;
    let require_tier = || {
        data.tier.ok_or_else(|| {
            AppError::BadRequest(format!("Event '{}' is missing 'tier'", event.event_type))
        })
    };

    match event.event_type.as_str() {
        "subscription.activated" => {
            user.subscription_tier = require_tier()?;
            user.subscription_status = SubscriptionStatus::Active;
            user.subscription_ends_at = data.current_period_end.map(format_utc_rfc3339);
            user.trial_ends_at = None;
        }
        "subscription.trial_started" => {
            let trial_end = data.trial_ends_at.ok_or_else(|| {
                AppError::BadRequest("Trial event is missing 'trial_ends_at'".to_string())
            })?;
            user.subscription_tier = require_tier()?;
            user.subscription_status = SubscriptionStatus::Trial;
            user.trial_ends_at = Some(format_utc_rfc3339(trial_end));
        }
        "subscription.payment_failed" => {
            user.subscription_status = SubscriptionStatus::PastDue;
        }
        "subscription.cancelled" => {
            user.subscription_status = SubscriptionStatus::Cancelled;
            if let Some(end) = data.current_period_end {
                user.subscription_ends_at = Some(format_utc_rfc3339(end));
            }
        }
        "subscription.expired" => {
            user.subscription_tier = SubscriptionTier::Free;
            user.subscription_status = SubscriptionStatus::Expired;
            user.trial_ends_at = None;
        }
        _ => return Ok(BillingOutcome::Ignored),
    }

    if let Some(customer_id) = &data.customer_id {
        user.billing_customer_id = Some(customer_id.clone());
    }
    user.updated_at = format_utc_rfc3339(now);

    Ok(BillingOutcome::Applied)
}
