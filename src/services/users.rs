// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User directory: profile lookups with an in-process cache.
//!
//! Nearly every API request needs the caller's subscription tier, so user
//! documents are cached per instance for a short time. Local writes
//! (profile edits, billing events) refresh or drop the cached copy; other
//! instances converge once their entry expires.

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::models::user::{ProfileUpdate, User};
use crate::services::subscription::{self, BillingEvent, BillingOutcome};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use validator::Validate;

/// How long a cached user document is trusted.
const CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Clone)]
struct CachedUser {
    user: User,
    cached_at: Instant,
}

/// Cached access to user documents.
#[derive(Clone)]
pub struct UserDirectory {
    db: FirestoreDb,
    cache: Arc<DashMap<String, CachedUser>>,
}

impl UserDirectory {
    pub fn new(db: FirestoreDb) -> Self {
        Self {
            db,
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Load the user, creating a free-tier document on first sign-in.
    pub async fn get_or_create(
        &self,
        user_id: &str,
        email: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<User> {
        if let Some(user) = self.cached(user_id) {
            return Ok(user);
        }

        let user = match self.db.get_user(user_id).await? {
            Some(user) => user,
            None => {
                let user = User::new(user_id, email.map(str::to_string), now);
                self.db.upsert_user(&user).await?;
                tracing::info!(user_id, "Created user on first sign-in");
                user
            }
        };

        self.remember(user.clone());
        Ok(user)
    }

    /// Apply a profile edit and persist it.
    pub async fn update_profile(
        &self,
        user_id: &str,
        email: Option<&str>,
        update: &ProfileUpdate,
        now: DateTime<Utc>,
    ) -> Result<User> {
        update.validate()?;

        let mut user = self.get_or_create(user_id, email, now).await?;
        update.apply(&mut user, now);
        self.db.upsert_user(&user).await?;
        self.remember(user.clone());

        tracing::info!(user_id, "Updated profile");
        Ok(user)
    }

    /// Apply a billing webhook event to the referenced user.
    ///
    /// Events for unknown users are ignored; the provider may retry events
    /// for accounts deleted in the meantime.
    pub async fn apply_billing_event(
        &self,
        event: &BillingEvent,
        now: DateTime<Utc>,
    ) -> Result<BillingOutcome> {
        let user_id = event.data.user_id.as_str();
        if !subscription::is_handled_event(&event.event_type) {
            tracing::debug!(user_id, event_type = %event.event_type, "Ignoring billing event");
            return Ok(BillingOutcome::Ignored);
        }

        let Some(mut user) = self.db.get_user(user_id).await? else {
            tracing::warn!(
                user_id,
                event_type = %event.event_type,
                "Billing event for unknown user"
            );
            return Ok(BillingOutcome::Ignored);
        };

        let outcome = subscription::apply_billing_event(&mut user, event, now)?;
        if outcome == BillingOutcome::Applied {
            self.db.upsert_user(&user).await?;
            self.invalidate(user_id);
            tracing::info!(
                user_id,
                event_type = %event.event_type,
                tier = ?user.subscription_tier,
                status = ?user.subscription_status,
                "Applied billing event"
            );
        }

        Ok(outcome)
    }

    /// Delete the user and everything they own.
    pub async fn delete_account(&self, user_id: &str) -> Result<usize> {
        let deleted = self.db.delete_user_data(user_id).await?;
        self.invalidate(user_id);
        Ok(deleted)
    }

    /// Drop any cached copy of the user.
    pub fn invalidate(&self, user_id: &str) {
        self.cache.remove(user_id);
    }

    fn cached(&self, user_id: &str) -> Option<User> {
        let entry = self.cache.get(user_id)?;
        if entry.cached_at.elapsed() < CACHE_TTL {
            return Some(entry.user.clone());
        }
        drop(entry);
        self.cache.remove(user_id);
        None
    }

    /// Cache a user document that was just read or written.
    ///
    /// Expired entries for other users are dropped at the same time.
    pub fn remember(&self, user: User) {
        self.cache
            .retain(|_, cached| cached.cached_at.elapsed() < CACHE_TTL);
        self.cache.insert(
            user.user_id.clone(),
            CachedUser {
                user,
                cached_at: Instant::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::user::SubscriptionTier;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_cached_user_is_served_without_database() {
        let directory = UserDirectory::new(FirestoreDb::new_mock());
        let mut user = User::new("user_1", None, now());
        user.subscription_tier = SubscriptionTier::Pro;
        directory.remember(user);

        let user = directory.get_or_create("user_1", None, now()).await.unwrap();
        assert_eq!(user.subscription_tier, SubscriptionTier::Pro);
    }

    #[test]
    fn test_remember_sweeps_expired_users() {
        let directory = UserDirectory::new(FirestoreDb::new_mock());
        let stale_at = Instant::now().checked_sub(CACHE_TTL * 2).unwrap();
        directory.cache.insert(
            "gone".to_string(),
            CachedUser {
                user: User::new("gone", None, now()),
                cached_at: stale_at,
            },
        );

        directory.remember(User::new("user_1", None, now()));

        assert!(!directory.cache.contains_key("gone"));
        assert!(directory.cache.contains_key("user_1"));
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let directory = UserDirectory::new(FirestoreDb::new_mock());
        directory.remember(User::new("user_1", None, now()));
        directory.invalidate("user_1");

        // Offline database: a reload attempt surfaces as a database error.
        let err = directory.get_or_create("user_1", None, now()).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_invalid_profile_update_is_rejected_first() {
        let directory = UserDirectory::new(FirestoreDb::new_mock());
        let update = ProfileUpdate {
            name: None,
            age: Some(200),
            weight_kg: None,
        };

        let err = directory
            .update_profile("user_1", None, &update, now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
