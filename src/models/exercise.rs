// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Logged exercise model for storage and API.
//!
//! Older documents carry scalar `sets`/`reps`/`weight` fields; newer ones
//! carry a `sets_data` list. Both are normalized into [`ExerciseEntry`]
//! when read, and every write uses the per-set shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Upper bound on sets per logged exercise.
pub const MAX_SETS_PER_ENTRY: usize = 50;

/// Exercise category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseCategory {
    Strength,
    Cardio,
    Flexibility,
    Balance,
    Sports,
    #[serde(other)]
    Other,
}

/// A single performed set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SetRecord {
    pub reps: u32,
    /// Weight in kilograms (0 for bodyweight)
    #[serde(default)]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SetRecord {
    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }
}

/// Normalized exercise entry used by all business logic.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseEntry {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub category: ExerciseCategory,
    pub sets: Vec<SetRecord>,
    pub duration_minutes: Option<f64>,
    pub performed_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl ExerciseEntry {
    /// Heaviest weight across all sets (0 when no sets).
    pub fn max_weight(&self) -> f64 {
        self.sets.iter().map(|s| s.weight).fold(0.0, f64::max)
    }

    pub fn total_reps(&self) -> u32 {
        self.sets.iter().map(|s| s.reps).sum()
    }

    /// Sum of weight × reps across sets.
    pub fn volume(&self) -> f64 {
        self.sets.iter().map(SetRecord::volume).sum()
    }

    /// Declared duration in minutes, if positive.
    pub fn duration(&self) -> Option<f64> {
        self.duration_minutes.filter(|d| *d > 0.0)
    }

    /// Whether this entry is for the named exercise (case/whitespace-insensitive).
    pub fn is_named(&self, name: &str) -> bool {
        name_key(&self.name) == name_key(name)
    }

    /// Storage representation (always the per-set shape).
    pub fn to_document(&self) -> ExerciseDocument {
        ExerciseDocument {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            name: self.name.clone(),
            category: self.category,
            sets_data: Some(self.sets.clone()),
            sets: None,
            reps: None,
            weight: None,
            duration: self.duration_minutes,
            performed_at: self.performed_at,
            notes: self.notes.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }
}

/// Normalized lookup key for exercise names.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Normalize stored documents and keep those for the named exercise.
///
/// Name matching happens here rather than in the query so that documents
/// written before names were normalized are still found.
pub fn entries_named(
    docs: impl IntoIterator<Item = ExerciseDocument>,
    name: &str,
) -> Vec<ExerciseEntry> {
    docs.into_iter()
        .map(ExerciseEntry::from)
        .filter(|e| e.is_named(name))
        .collect()
}

/// Stored exercise document in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseDocument {
    /// Document ID (UUID v4)
    pub id: String,
    /// Owner (identity provider subject)
    pub user_id: String,
    pub name: String,
    pub category: ExerciseCategory,
    /// Per-set records (current shape)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets_data: Option<Vec<SetRecord>>,
    /// Legacy: number of identical sets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    /// Legacy: reps per set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    /// Legacy: weight per set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Duration in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// When the exercise was performed (may be backdated)
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub performed_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
    /// When this document was created (ISO 8601)
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl From<ExerciseDocument> for ExerciseEntry {
    fn from(doc: ExerciseDocument) -> Self {
        let sets = match doc.sets_data {
            Some(sets) if !sets.is_empty() => sets,
            _ => legacy_sets(doc.sets, doc.reps, doc.weight),
        };

        ExerciseEntry {
            id: doc.id,
            user_id: doc.user_id,
            name: doc.name,
            category: doc.category,
            sets,
            duration_minutes: doc.duration,
            performed_at: doc.performed_at,
            notes: doc.notes,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// Expand legacy scalar fields into identical per-set records.
fn legacy_sets(sets: Option<u32>, reps: Option<u32>, weight: Option<f64>) -> Vec<SetRecord> {
    let Some(reps) = reps.filter(|r| *r > 0) else {
        return Vec::new();
    };

    let count = (sets.unwrap_or(1).max(1) as usize).min(MAX_SETS_PER_ENTRY);
    vec![
        SetRecord {
            reps,
            weight: weight.unwrap_or(0.0).max(0.0),
            notes: None,
        };
        count
    ]
}

// ─── Request Input ───────────────────────────────────────────

/// One set as submitted by the client.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetInput {
    #[validate(range(min = 1, max = 10000, message = "reps must be a positive number"))]
    pub reps: i64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 2000.0, message = "weight cannot be negative"))]
    pub weight: f64,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Body for logging or editing an exercise.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ExerciseInput {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    pub category: ExerciseCategory,
    #[validate(
        length(min = 1, max = 50, message = "at least one set is required"),
        nested
    )]
    pub sets: Vec<SetInput>,
    #[validate(range(min = 0.0, max = 1440.0, message = "duration cannot be negative"))]
    pub duration_minutes: Option<f64>,
    /// RFC3339; defaults to now
    pub performed_at: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl ExerciseInput {
    /// Per-set records, assuming `validate()` has passed.
    pub fn set_records(&self) -> Vec<SetRecord> {
        self.sets
            .iter()
            .map(|s| SetRecord {
                reps: u32::try_from(s.reps).unwrap_or(0),
                weight: s.weight,
                notes: clean_optional(s.notes.as_deref()),
            })
            .collect()
    }
}

/// Trim an optional free-text field, dropping it when blank.
pub fn clean_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Longest accepted name, counted in characters after trimming.
pub const MAX_NAME_CHARS: usize = 100;

/// Names must have 1..=100 characters once surrounding whitespace is removed.
pub(crate) fn validate_name(value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len == 0 {
        let mut err = ValidationError::new("blank");
        err.message = Some("name is required".into());
        return Err(err);
    }
    if len > MAX_NAME_CHARS {
        let mut err = ValidationError::new("length");
        err.message = Some("name must be at most 100 characters".into());
        return Err(err);
    }
    Ok(())
}
