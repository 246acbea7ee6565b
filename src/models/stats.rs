//! Aggregated statistics returned by the stats endpoints.
//!
//! These are computed on demand from a user's exercise history; the
//! routines that build them live in `services`.

use crate::models::exercise::{ExerciseCategory, ExerciseEntry};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

// ─── Personal Records ────────────────────────────────────────

/// Dimension along which a personal record was set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum RecordDimension {
    Weight,
    Time,
}

/// Outcome of checking a new entry against prior history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PersonalRecordCheck {
    pub is_new_pr: bool,
    pub dimension: Option<RecordDimension>,
}

impl PersonalRecordCheck {
    pub fn none() -> Self {
        Self {
            is_new_pr: false,
            dimension: None,
        }
    }

    pub fn new_record(dimension: RecordDimension) -> Self {
        Self {
            is_new_pr: true,
            dimension: Some(dimension),
        }
    }
}

/// Best-ever values for one exercise name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PersonalBest {
    pub name: String,
    pub category: ExerciseCategory,
    pub best_weight: Option<f64>,
    pub best_weight_at: Option<String>,
    pub best_duration_minutes: Option<f64>,
    pub best_duration_at: Option<String>,
    pub sessions: u32,
}

// ─── Streaks & Overview ──────────────────────────────────────

/// Consecutive-day workout streaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StreakSummary {
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Dashboard summary for a user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatsOverview {
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Total logged exercise entries
    pub total_entries: u32,
    /// Distinct calendar days with at least one entry
    pub workout_days: u32,
    /// Sum of weight × reps across all sets (kg)
    pub total_volume: f64,
    pub total_duration_minutes: f64,
    /// Distinct workout days in the last 7 days (including today)
    pub workouts_this_week: u32,
    /// Category with the most entries (ties broken alphabetically)
    pub top_category: Option<ExerciseCategory>,
}

// ─── Progress Charts ─────────────────────────────────────────

/// Which scalar a progress series plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    /// Σ weight × reps per day
    Volume,
    /// Σ minutes per day
    Duration,
}

/// Per-entry detail shown in a chart tooltip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DayBreakdown {
    pub entry_id: String,
    pub performed_at: String,
    pub set_count: u32,
    pub total_reps: u32,
    pub max_weight: f64,
    pub volume: f64,
    pub duration_minutes: Option<f64>,
}

/// One plotted day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgressPoint {
    /// Calendar day (YYYY-MM-DD)
    pub date: String,
    pub value: f64,
    pub entries: Vec<DayBreakdown>,
}

/// Time-ordered series for one exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgressSeries {
    pub name: String,
    pub mode: ChartMode,
    pub points: Vec<ProgressPoint>,
}

// ─── Two-Point Comparison ────────────────────────────────────

/// Derived stats for a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EntryStats {
    pub set_count: u32,
    pub total_reps: u32,
    pub max_weight: f64,
    pub total_volume: f64,
}

impl From<&ExerciseEntry> for EntryStats {
    fn from(entry: &ExerciseEntry) -> Self {
        Self {
            set_count: entry.sets.len() as u32,
            total_reps: entry.total_reps(),
            max_weight: entry.max_weight(),
            total_volume: entry.volume(),
        }
    }
}

/// Signed difference `second - first`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatsDelta {
    pub set_count: i64,
    pub total_reps: i64,
    pub max_weight: f64,
    pub total_volume: f64,
}

impl StatsDelta {
    pub fn between(first: &EntryStats, second: &EntryStats) -> Self {
        Self {
            set_count: i64::from(second.set_count) - i64::from(first.set_count),
            total_reps: i64::from(second.total_reps) - i64::from(first.total_reps),
            max_weight: second.max_weight - first.max_weight,
            total_volume: second.total_volume - first.total_volume,
        }
    }
}

/// One side of a comparison; `entry_id` is `None` when nothing was logged that day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ComparisonSide {
    pub date: String,
    pub found: bool,
    pub entry_id: Option<String>,
    pub performed_at: Option<String>,
    pub stats: EntryStats,
}

/// Result of comparing two dated entries for the same exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Comparison {
    pub name: String,
    pub first: ComparisonSide,
    pub second: ComparisonSide,
    pub delta: StatsDelta,
}
