// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Exercise library (catalog) model.

use crate::models::exercise::ExerciseCategory;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Difficulty rating for a library exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Catalog entry describing an exercise (not user-owned).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExerciseLibraryItem {
    /// Stable slug (e.g., "barbell-back-squat")
    pub id: String,
    pub name: String,
    pub category: ExerciseCategory,
    /// Primary muscle group (e.g., "chest", "quadriceps")
    pub muscle: String,
    pub difficulty: Difficulty,
    /// Required equipment ("none" for bodyweight)
    pub equipment: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
}

/// Filters for searching the library. All set filters must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibraryFilter {
    /// Free-text search over name, muscle and description
    pub q: Option<String>,
    pub category: Option<ExerciseCategory>,
    pub muscle: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub equipment: Option<String>,
}

impl LibraryFilter {
    pub fn matches(&self, item: &ExerciseLibraryItem) -> bool {
        if self.category.is_some_and(|c| c != item.category) {
            return false;
        }
        if self.difficulty.is_some_and(|d| d != item.difficulty) {
            return false;
        }
        if let Some(muscle) = non_blank(self.muscle.as_deref()) {
            if !item.muscle.eq_ignore_ascii_case(muscle) {
                return false;
            }
        }
        if let Some(equipment) = non_blank(self.equipment.as_deref()) {
            if !item.equipment.eq_ignore_ascii_case(equipment) {
                return false;
            }
        }
        if let Some(q) = non_blank(self.q.as_deref()) {
            let q = q.to_lowercase();
            let haystacks = [&item.name, &item.muscle, &item.description];
            if !haystacks.iter().any(|h| h.to_lowercase().contains(&q)) {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
