// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Two-point comparison between entries for the same exercise.

use crate::models::exercise::ExerciseEntry;
use crate::models::stats::{Comparison, ComparisonSide, EntryStats, StatsDelta};
use crate::time_utils::{format_utc_rfc3339, local_day};
use chrono::{FixedOffset, NaiveDate};

/// Compare the entries for `name` logged on two calendar days.
///
/// Each side uses the earliest entry performed that day. A day with no
/// entry yields `found: false` and zeroed stats; the delta is always
/// `second - first`.
pub fn compare_days(
    name: &str,
    entries: &[ExerciseEntry],
    first: NaiveDate,
    second: NaiveDate,
    offset: FixedOffset,
) -> Comparison {
    let first = side_for_day(name, entries, first, offset);
    let second = side_for_day(name, entries, second, offset);
    let delta = StatsDelta::between(&first.stats, &second.stats);

    Comparison {
        name: name.trim().to_string(),
        first,
        second,
        delta,
    }
}

fn side_for_day(
    name: &str,
    entries: &[ExerciseEntry],
    day: NaiveDate,
    offset: FixedOffset,
) -> ComparisonSide {
    let chosen = entries
        .iter()
        .filter(|e| e.is_named(name) && local_day(e.performed_at, offset) == day)
        .min_by(|a, b| a.performed_at.cmp(&b.performed_at).then_with(|| a.id.cmp(&b.id)));

    ComparisonSide {
        date: day.format("%Y-%m-%d").to_string(),
        found: chosen.is_some(),
        entry_id: chosen.map(|e| e.id.clone()),
        performed_at: chosen.map(|e| format_utc_rfc3339(e.performed_at)),
        stats: chosen.map(EntryStats::from).unwrap_or_default(),
    }
}
