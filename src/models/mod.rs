// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod exercise;
pub mod library;
pub mod stats;
pub mod template;
pub mod user;

pub use exercise::{ExerciseCategory, ExerciseDocument, ExerciseEntry, SetRecord};
pub use library::{Difficulty, ExerciseLibraryItem, LibraryFilter};
pub use stats::{PersonalRecordCheck, RecordDimension, StatsOverview, StreakSummary};
pub use template::{PlannedExercise, WorkoutTemplate};
pub use user::{SubscriptionStatus, SubscriptionTier, User};
