// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout streaks and dashboard overview.

use crate::models::exercise::{ExerciseCategory, ExerciseEntry};
use crate::models::stats::{StatsOverview, StreakSummary};
use crate::time_utils::local_day;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use std::collections::{BTreeSet, HashMap};

/// Compute current and longest consecutive-day streaks.
///
/// Timestamps are reduced to calendar days in `offset`. The current streak
/// counts back from `today`, or from yesterday when nothing is logged
/// today yet; any other gap makes it zero.
pub fn compute_streaks<I>(timestamps: I, today: NaiveDate, offset: FixedOffset) -> StreakSummary
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let days: BTreeSet<NaiveDate> = timestamps
        .into_iter()
        .map(|ts| local_day(ts, offset))
        .collect();

    StreakSummary {
        current_streak: current_streak(&days, today),
        longest_streak: longest_streak(&days),
    }
}

fn longest_streak(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut running = 0;
    let mut previous: Option<NaiveDate> = None;

    for &day in days {
        running = match previous {
            Some(prev) if prev.succ_opt() == Some(day) => running + 1,
            _ => 1,
        };
        longest = longest.max(running);
        previous = Some(day);
    }

    longest
}

fn current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let start = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut count = 0;
    let mut day = Some(start);
    while let Some(d) = day.filter(|d| days.contains(d)) {
        count += 1;
        day = d.pred_opt();
    }
    count
}

/// Build the dashboard overview from a user's full history.
pub fn summarize(entries: &[ExerciseEntry], now: DateTime<Utc>, offset: FixedOffset) -> StatsOverview {
    let today = local_day(now, offset);
    let streaks = compute_streaks(entries.iter().map(|e| e.performed_at), today, offset);

    let days: BTreeSet<NaiveDate> = entries
        .iter()
        .map(|e| local_day(e.performed_at, offset))
        .collect();
    let week_start = today - Duration::days(6);
    let workouts_this_week = days.range(week_start..=today).count() as u32;

    let mut per_category: HashMap<ExerciseCategory, u32> = HashMap::new();
    for entry in entries {
        *per_category.entry(entry.category).or_insert(0) += 1;
    }
    let top_category = per_category
        .into_iter()
        .max_by(|(ca, a), (cb, b)| a.cmp(b).then_with(|| category_label(*cb).cmp(category_label(*ca))))
        .map(|(category, _)| category);

    StatsOverview {
        current_streak: streaks.current_streak,
        longest_streak: streaks.longest_streak,
        total_entries: entries.len() as u32,
        workout_days: days.len() as u32,
        total_volume: entries.iter().map(ExerciseEntry::volume).sum(),
        total_duration_minutes: entries.iter().filter_map(ExerciseEntry::duration).sum(),
        workouts_this_week,
        top_category,
    }
}

fn category_label(category: ExerciseCategory) -> &'static str {
    match category {
        ExerciseCategory::Strength => "strength",
        ExerciseCategory::Cardio => "cardio",
        ExerciseCategory::Flexibility => "flexibility",
        ExerciseCategory::Balance => "balance",
        ExerciseCategory::Sports => "sports",
        ExerciseCategory::Other => "other",
    }
}
