// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout template model.
//!
//! Pre-built templates ship with the service and are read-only; user
//! templates live in Firestore and can only be changed by their creator.

use crate::error::{AppError, Result};
use crate::models::exercise::{validate_name, ExerciseCategory};
use serde::{Deserialize, Serialize};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A planned exercise within a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlannedExercise {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    pub category: ExerciseCategory,
    #[validate(range(min = 1, max = 20))]
    pub target_sets: u32,
    #[validate(range(min = 1, max = 100))]
    pub target_reps: u32,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 2000.0))]
    pub target_weight: Option<f64>,
    #[serde(default)]
    #[validate(range(max = 600))]
    pub rest_seconds: Option<u32>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Workout template (pre-built or user-created).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutTemplate {
    /// Document ID (UUID v4, or a stable slug for pre-built templates)
    pub id: String,
    /// Creator; `None` for pre-built templates
    #[serde(default)]
    pub owner_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Ordered list of planned exercises
    pub exercises: Vec<PlannedExercise>,
    #[serde(default)]
    pub is_prebuilt: bool,
    #[serde(default)]
    pub usage_count: u32,
    /// Last time the template was used to start a workout (ISO 8601)
    #[serde(default)]
    pub last_used_at: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl WorkoutTemplate {
    /// Reject changes unless `user_id` created this template.
    pub fn ensure_editable_by(&self, user_id: &str) -> Result<()> {
        if self.is_prebuilt {
            return Err(AppError::Forbidden(
                "Pre-built templates are read-only".to_string(),
            ));
        }
        match self.owner_id.as_deref() {
            Some(owner) if owner == user_id => Ok(()),
            _ => Err(AppError::Forbidden(
                "Template belongs to another user".to_string(),
            )),
        }
    }

    /// Whether `user_id` may see this template.
    pub fn is_visible_to(&self, user_id: &str) -> bool {
        self.is_prebuilt || self.owner_id.as_deref() == Some(user_id)
    }

    /// Record that the template was used to start a workout.
    pub fn record_usage(&mut self, now: &str) {
        self.usage_count = self.usage_count.saturating_add(1);
        self.last_used_at = Some(now.to_string());
    }
}

/// Body for creating or replacing a template.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TemplateInput {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(
        length(min = 1, max = 30, message = "at least one exercise is required"),
        nested
    )]
    pub exercises: Vec<PlannedExercise>,
}
