// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running.
//! Run with: FIRESTORE_EMULATOR_HOST=localhost:8080 cargo test --test firestore_integration
//!
//! Each test uses a fresh user ID so runs do not interfere.

use chrono::{Duration, Utc};
use workout_tracker::error::AppError;
use workout_tracker::models::exercise::{ExerciseInput, SetInput};
use workout_tracker::models::template::{PlannedExercise, WorkoutTemplate};
use workout_tracker::models::{ExerciseCategory, RecordDimension, SubscriptionTier};
use workout_tracker::services::subscription::{self, BillingEvent, BillingEventData, BillingOutcome};
use workout_tracker::services::{ExerciseLog, UserDirectory};

mod common;
use common::test_db;

fn unique_user_id() -> String {
    format!("test-{}", uuid::Uuid::new_v4())
}

fn squat(sets: &[(i64, f64)], days_ago: i64) -> ExerciseInput {
    ExerciseInput {
        name: "Back Squat".to_string(),
        category: ExerciseCategory::Strength,
        sets: sets
            .iter()
            .map(|&(reps, weight)| SetInput {
                reps,
                weight,
                notes: None,
            })
            .collect(),
        duration_minutes: None,
        performed_at: Some((Utc::now() - Duration::days(days_ago)).to_rfc3339()),
        notes: None,
    }
}

fn user_template(owner: &str, name: &str) -> WorkoutTemplate {
    let now = Utc::now().to_rfc3339();
    WorkoutTemplate {
        id: uuid::Uuid::new_v4().to_string(),
        owner_id: Some(owner.to_string()),
        name: name.to_string(),
        description: None,
        exercises: vec![PlannedExercise {
            name: "Back Squat".to_string(),
            category: ExerciseCategory::Strength,
            target_sets: 3,
            target_reps: 5,
            target_weight: Some(100.0),
            rest_seconds: Some(120),
            notes: None,
        }],
        is_prebuilt: false,
        usage_count: 0,
        last_used_at: None,
        created_at: now.clone(),
        updated_at: now,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// USER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_first_sign_in_creates_free_user() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();

    assert!(db.get_user(&user_id).await.unwrap().is_none());

    let users = UserDirectory::new(db.clone());
    let user = users
        .get_or_create(&user_id, Some("new@example.com"), Utc::now())
        .await
        .unwrap();
    assert_eq!(user.subscription_tier, SubscriptionTier::Free);

    let stored = db.get_user(&user_id).await.unwrap().expect("user stored");
    assert_eq!(stored.email.as_deref(), Some("new@example.com"));
}

#[tokio::test]
async fn test_billing_event_upgrades_user() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let users = UserDirectory::new(db.clone());
    users.get_or_create(&user_id, None, Utc::now()).await.unwrap();

    let event = BillingEvent {
        event_type: "subscription.activated".to_string(),
        data: BillingEventData {
            user_id: user_id.clone(),
            customer_id: Some("cus_123".to_string()),
            tier: Some(SubscriptionTier::Premium),
            trial_ends_at: None,
            current_period_end: Some(Utc::now() + Duration::days(30)),
        },
    };
    let outcome = users.apply_billing_event(&event, Utc::now()).await.unwrap();
    assert_eq!(outcome, BillingOutcome::Applied);

    // The cached copy was dropped, so this reads the stored document.
    let user = users.get_or_create(&user_id, None, Utc::now()).await.unwrap();
    assert_eq!(
        subscription::effective_tier(&user, Utc::now()),
        SubscriptionTier::Premium
    );
}

#[tokio::test]
async fn test_billing_event_for_unknown_user_is_ignored() {
    require_emulator!();

    let db = test_db().await;
    let users = UserDirectory::new(db);

    let event = BillingEvent {
        event_type: "subscription.expired".to_string(),
        data: BillingEventData {
            user_id: unique_user_id(),
            customer_id: None,
            tier: None,
            trial_ends_at: None,
            current_period_end: None,
        },
    };
    let outcome = users.apply_billing_event(&event, Utc::now()).await.unwrap();
    assert_eq!(outcome, BillingOutcome::Ignored);
}

// ═══════════════════════════════════════════════════════════════════════════
// EXERCISE TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_personal_records_across_log() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let log = ExerciseLog::new(db.clone());

    let first = log
        .log_exercise(&user_id, &squat(&[(5, 100.0)], 3), Utc::now())
        .await
        .unwrap();
    assert!(first.personal_record.is_new_pr, "first entry is always a PR");

    let lighter = log
        .log_exercise(&user_id, &squat(&[(5, 95.0), (5, 100.0)], 2), Utc::now())
        .await
        .unwrap();
    assert!(!lighter.personal_record.is_new_pr);

    let heavier = log
        .log_exercise(&user_id, &squat(&[(3, 105.0)], 1), Utc::now())
        .await
        .unwrap();
    assert!(heavier.personal_record.is_new_pr);
    assert_eq!(
        heavier.personal_record.dimension,
        Some(RecordDimension::Weight)
    );

    let history = db
        .get_exercises_by_name(&user_id, "back squat", None, None)
        .await
        .unwrap();
    assert_eq!(history.len(), 3);
    assert!(history
        .windows(2)
        .all(|w| w[0].performed_at <= w[1].performed_at));
}

#[tokio::test]
async fn test_name_query_respects_time_range() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let log = ExerciseLog::new(db.clone());

    for days_ago in [10, 5, 1] {
        log.log_exercise(&user_id, &squat(&[(5, 100.0)], days_ago), Utc::now())
            .await
            .unwrap();
    }

    let from = Utc::now() - Duration::days(7);
    let until = Utc::now() - Duration::hours(12);
    let in_range = db
        .get_exercises_by_name(&user_id, "Back Squat", Some(from), Some(until))
        .await
        .unwrap();
    assert_eq!(in_range.len(), 1);
}

#[tokio::test]
async fn test_other_users_cannot_touch_entry() {
    require_emulator!();

    let db = test_db().await;
    let owner = unique_user_id();
    let intruder = unique_user_id();
    let log = ExerciseLog::new(db.clone());

    let logged = log
        .log_exercise(&owner, &squat(&[(5, 80.0)], 0), Utc::now())
        .await
        .unwrap();
    let id = logged.entry.id;

    assert!(matches!(
        log.get_exercise(&intruder, &id).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        log.update_exercise(&intruder, &id, &squat(&[(5, 200.0)], 0), Utc::now())
            .await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        log.delete_exercise(&intruder, &id).await,
        Err(AppError::Forbidden(_))
    ));

    // Still there for the owner.
    assert_eq!(log.get_exercise(&owner, &id).await.unwrap().max_weight(), 80.0);
}

#[tokio::test]
async fn test_update_keeps_creation_time() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let log = ExerciseLog::new(db.clone());

    let logged = log
        .log_exercise(&user_id, &squat(&[(5, 80.0)], 0), Utc::now())
        .await
        .unwrap();
    let updated = log
        .update_exercise(
            &user_id,
            &logged.entry.id,
            &squat(&[(5, 85.0), (5, 85.0)], 0),
            Utc::now(),
        )
        .await
        .unwrap();

    assert_eq!(updated.created_at, logged.entry.created_at);
    assert!(updated.updated_at.is_some());
    assert_eq!(updated.sets.len(), 2);
}

#[tokio::test]
async fn test_exercise_listing_pages_newest_first() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let log = ExerciseLog::new(db.clone());

    for days_ago in [4, 3, 2, 1] {
        log.log_exercise(&user_id, &squat(&[(5, 100.0)], days_ago), Utc::now())
            .await
            .unwrap();
    }

    let first_page = db
        .get_exercises_for_user(&user_id, None, 3, 0)
        .await
        .unwrap();
    assert_eq!(first_page.len(), 3);
    assert!(first_page[0].performed_at > first_page[1].performed_at);

    let second_page = db
        .get_exercises_for_user(&user_id, None, 3, 3)
        .await
        .unwrap();
    assert_eq!(second_page.len(), 1);

    let cardio = db
        .get_exercises_for_user(&user_id, Some(ExerciseCategory::Cardio), 10, 0)
        .await
        .unwrap();
    assert!(cardio.is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// TEMPLATE TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_free_template_quota_counts_only_own_templates() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let other = unique_user_id();

    for name in ["Push", "Pull", "Legs"] {
        db.set_template(&user_template(&user_id, name)).await.unwrap();
    }
    db.set_template(&user_template(&other, "Other")).await.unwrap();

    let owned = db.count_templates_for_user(&user_id).await.unwrap();
    assert_eq!(owned, 3);
    assert!(matches!(
        subscription::check_template_quota(SubscriptionTier::Free, owned),
        Err(AppError::LimitExceeded(_))
    ));
    assert!(subscription::check_template_quota(SubscriptionTier::Premium, owned).is_ok());

    let listed = db.get_templates_for_user(&user_id).await.unwrap();
    assert_eq!(listed.len(), 3);
    assert!(listed.iter().all(|t| t.owner_id.as_deref() == Some(user_id.as_str())));
}

// ═══════════════════════════════════════════════════════════════════════════
// DELETION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_delete_account_removes_all_user_data() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let users = UserDirectory::new(db.clone());
    let log = ExerciseLog::new(db.clone());

    users.get_or_create(&user_id, None, Utc::now()).await.unwrap();
    for days_ago in [2, 1] {
        log.log_exercise(&user_id, &squat(&[(5, 100.0)], days_ago), Utc::now())
            .await
            .unwrap();
    }
    db.set_template(&user_template(&user_id, "Legs")).await.unwrap();

    let deleted = users.delete_account(&user_id).await.unwrap();
    assert_eq!(deleted, 4, "2 exercises + 1 template + user document");

    assert!(db.get_user(&user_id).await.unwrap().is_none());
    assert!(db.get_all_exercises_for_user(&user_id).await.unwrap().is_empty());
    assert_eq!(db.count_templates_for_user(&user_id).await.unwrap(), 0);
}
