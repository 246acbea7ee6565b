// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Progress chart aggregation for a single exercise.

use crate::models::exercise::ExerciseEntry;
use crate::models::stats::{ChartMode, DayBreakdown, ProgressPoint, ProgressSeries};
use crate::time_utils::{format_utc_rfc3339, local_day};
use chrono::{FixedOffset, NaiveDate};
use std::collections::BTreeMap;

/// Group entries by calendar day and reduce each day to one value.
///
/// The mode is decided once for the whole series: if any entry carries a
/// duration the series plots minutes, otherwise volume (weight × reps).
pub fn build_progress_series(
    name: &str,
    entries: &[ExerciseEntry],
    offset: FixedOffset,
) -> ProgressSeries {
    let mode = if entries.iter().any(|e| e.duration_minutes.is_some()) {
        ChartMode::Duration
    } else {
        ChartMode::Volume
    };

    let mut by_day: BTreeMap<NaiveDate, Vec<&ExerciseEntry>> = BTreeMap::new();
    for entry in entries {
        by_day
            .entry(local_day(entry.performed_at, offset))
            .or_default()
            .push(entry);
    }

    let points = by_day
        .into_iter()
        .map(|(day, mut day_entries)| {
            day_entries.sort_by_key(|e| e.performed_at);

            let value = day_entries
                .iter()
                .map(|e| match mode {
                    ChartMode::Volume => e.volume(),
                    ChartMode::Duration => e.duration_minutes.unwrap_or(0.0).max(0.0),
                })
                .sum();

            ProgressPoint {
                date: day.format("%Y-%m-%d").to_string(),
                value,
                entries: day_entries.into_iter().map(breakdown).collect(),
            }
        })
        .collect();

    ProgressSeries {
        name: name.trim().to_string(),
        mode,
        points,
    }
}

fn breakdown(entry: &ExerciseEntry) -> DayBreakdown {
    DayBreakdown {
        entry_id: entry.id.clone(),
        performed_at: format_utc_rfc3339(entry.performed_at),
        set_count: entry.sets.len() as u32,
        total_reps: entry.total_reps(),
        max_weight: entry.max_weight(),
        volume: entry.volume(),
        duration_minutes: entry.duration_minutes,
    }
}
