// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.
//!
//! The aggregation routines (`records`, `streaks`, `progress`,
//! `comparison`) are pure functions over a user's history; the remaining
//! services wrap the database.

pub mod billing;
pub mod catalog;
pub mod comparison;
pub mod exercise_log;
pub mod progress;
pub mod records;
pub mod streaks;
pub mod subscription;
pub mod users;

pub use catalog::{CatalogError, CatalogService};
pub use exercise_log::{ExerciseLog, LoggedExercise};
pub use users::UserDirectory;
