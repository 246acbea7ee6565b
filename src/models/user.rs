//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Premium,
    Pro,
}

/// Subscription lifecycle status, as reported by the billing provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Trial,
    PastDue,
    Cancelled,
    Expired,
}

/// User profile stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Identity provider subject (also used as document ID)
    pub user_id: String,
    /// Email address (may be None if the provider did not share it)
    pub email: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    /// Body weight in kilograms
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub subscription_tier: SubscriptionTier,
    #[serde(default)]
    pub subscription_status: SubscriptionStatus,
    /// End of the trial period (ISO 8601)
    #[serde(default)]
    pub trial_ends_at: Option<String>,
    /// End of the paid period (ISO 8601)
    #[serde(default)]
    pub subscription_ends_at: Option<String>,
    /// Billing provider customer ID
    #[serde(default)]
    pub billing_customer_id: Option<String>,
    /// When the user first signed in
    pub created_at: String,
    /// Last profile or subscription change
    pub updated_at: String,
}

impl User {
    /// A brand-new user on the free tier (first sign-in).
    pub fn new(user_id: &str, email: Option<String>, now: DateTime<Utc>) -> Self {
        let now = crate::time_utils::format_utc_rfc3339(now);
        Self {
            user_id: user_id.to_string(),
            email,
            name: None,
            age: None,
            weight_kg: None,
            subscription_tier: SubscriptionTier::Free,
            subscription_status: SubscriptionStatus::Active,
            trial_ends_at: None,
            subscription_ends_at: None,
            billing_customer_id: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Body for `PUT /api/me`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 13, max = 120, message = "age must be between 13 and 120"))]
    pub age: Option<u32>,
    #[validate(range(min = 20.0, max = 500.0, message = "weight must be between 20 and 500 kg"))]
    pub weight_kg: Option<f64>,
}

impl ProfileUpdate {
    /// Apply the edit; fields left out of the request are unchanged.
    pub fn apply(&self, user: &mut User, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            user.name = crate::models::exercise::clean_optional(Some(name));
        }
        if self.age.is_some() {
            user.age = self.age;
        }
        if self.weight_kg.is_some() {
            user.weight_kg = self.weight_kg;
        }
        user.updated_at = crate::time_utils::format_utc_rfc3339(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_user_is_free_and_active() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let user = User::new("user_1", Some("a@example.com".to_string()), now);

        assert_eq!(user.subscription_tier, SubscriptionTier::Free);
        assert_eq!(user.subscription_status, SubscriptionStatus::Active);
        assert_eq!(user.created_at, "2024-01-15T10:00:00Z");
    }

    #[test]
    fn test_profile_update_keeps_missing_fields() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let mut user = User::new("user_1", None, now);
        user.age = Some(30);

        let update = ProfileUpdate {
            name: Some("  Sam  ".to_string()),
            age: None,
            weight_kg: Some(72.5),
        };
        update.apply(&mut user, now);

        assert_eq!(user.name.as_deref(), Some("Sam"));
        assert_eq!(user.age, Some(30));
        assert_eq!(user.weight_kg, Some(72.5));
    }

    #[test]
    fn test_profile_update_validation() {
        let update = ProfileUpdate {
            name: None,
            age: Some(7),
            weight_kg: None,
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&SubscriptionStatus::PastDue).unwrap();
        assert_eq!(json, "\"past_due\"");
    }
}
