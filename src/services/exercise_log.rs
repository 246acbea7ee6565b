// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise logging service.
//!
//! Handles the write workflow for logged exercises:
//! 1. Validate the submitted entry
//! 2. Resolve `performed_at` (defaults to now, may be backdated)
//! 3. Check the user's history for a personal record
//! 4. Store the entry in the per-set shape
//!
//! Every operation is scoped to the calling user; entries owned by
//! someone else are rejected with `Forbidden`.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::exercise::{clean_optional, ExerciseEntry, ExerciseInput};
use crate::models::PersonalRecordCheck;
use crate::services::records::detect_personal_record;
use crate::time_utils::{format_utc_rfc3339, parse_timestamp};
use chrono::{DateTime, Duration, Utc};
use validator::Validate;

/// How far into the future `performed_at` may be (clock skew, time zones).
const MAX_FUTURE_SKEW_HOURS: i64 = 24;

/// A freshly logged entry and its personal-record check.
#[derive(Debug, Clone)]
pub struct LoggedExercise {
    pub entry: ExerciseEntry,
    pub personal_record: PersonalRecordCheck,
}

/// Create, edit and delete a user's logged exercises.
#[derive(Clone)]
pub struct ExerciseLog {
    db: FirestoreDb,
}

impl ExerciseLog {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Log a new exercise and report whether it set a personal record.
    pub async fn log_exercise(
        &self,
        user_id: &str,
        input: &ExerciseInput,
        now: DateTime<Utc>,
    ) -> Result<LoggedExercise> {
        let entry = build_entry(
            uuid::Uuid::new_v4().to_string(),
            user_id,
            input,
            format_utc_rfc3339(now),
            now,
        )?;

        let history = self
            .db
            .get_exercises_by_name(user_id, &entry.name, None, None)
            .await?;
        let personal_record = detect_personal_record(&history, &entry);

        self.db.set_exercise(&entry).await?;

        tracing::info!(
            user_id,
            entry_id = %entry.id,
            sets = entry.sets.len(),
            is_new_pr = personal_record.is_new_pr,
            "Logged exercise"
        );

        Ok(LoggedExercise {
            entry,
            personal_record,
        })
    }

    /// Fetch one of the user's entries.
    pub async fn get_exercise(&self, user_id: &str, entry_id: &str) -> Result<ExerciseEntry> {
        let entry = self
            .db
            .get_exercise(entry_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Exercise {} not found", entry_id)))?;
        ensure_owned(&entry, user_id)?;
        Ok(entry)
    }

    /// Replace an existing entry, keeping its ID and creation time.
    pub async fn update_exercise(
        &self,
        user_id: &str,
        entry_id: &str,
        input: &ExerciseInput,
        now: DateTime<Utc>,
    ) -> Result<ExerciseEntry> {
        // Reject bad input before touching the database.
        input.validate()?;

        let existing = self.get_exercise(user_id, entry_id).await?;
        let mut entry = build_entry(
            existing.id,
            user_id,
            input,
            existing.created_at,
            now,
        )?;
        entry.updated_at = Some(format_utc_rfc3339(now));

        self.db.set_exercise(&entry).await?;
        tracing::info!(user_id, entry_id, "Updated exercise");

        Ok(entry)
    }

    pub async fn delete_exercise(&self, user_id: &str, entry_id: &str) -> Result<()> {
        self.get_exercise(user_id, entry_id).await?;
        self.db.delete_exercise(entry_id).await?;
        tracing::info!(user_id, entry_id, "Deleted exercise");
        Ok(())
    }
}

/// Build a normalized entry from validated input.
pub fn build_entry(
    id: String,
    user_id: &str,
    input: &ExerciseInput,
    created_at: String,
    now: DateTime<Utc>,
) -> Result<ExerciseEntry> {
    input.validate()?;

    let performed_at = parse_timestamp(input.performed_at.as_deref(), "performed_at")?.unwrap_or(now);
    if performed_at > now + Duration::hours(MAX_FUTURE_SKEW_HOURS) {
        return Err(AppError::BadRequest(
            "performed_at cannot be more than a day in the future".to_string(),
        ));
    }

    Ok(ExerciseEntry {
        id,
        user_id: user_id.to_string(),
        name: input.name.trim().to_string(),
        category: input.category,
        sets: input.set_records(),
        duration_minutes: input.duration_minutes,
        performed_at,
        notes: clean_optional(input.notes.as_deref()),
        created_at,
        updated_at: None,
    })
}

fn ensure_owned(entry: &ExerciseEntry, user_id: &str) -> Result<()> {
    if entry.user_id == user_id {
        Ok(())
    } else {
        tracing::warn!(
            user_id,
            entry_id = %entry.id,
            "Rejected access to another user's exercise"
        );
        Err(AppError::Forbidden(
            "Exercise belongs to another user".to_string(),
        ))
    }
}
