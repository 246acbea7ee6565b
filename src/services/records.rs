// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Personal-record detection.
//!
//! Two independent dimensions are tracked per exercise name: heaviest
//! weight across all sets, and longest declared duration. A new entry sets
//! a record in a dimension when its value strictly exceeds every prior
//! value in that dimension, or when no prior entry has a value there.

use crate::models::exercise::{name_key, ExerciseEntry};
use crate::models::stats::{PersonalBest, PersonalRecordCheck, RecordDimension};
use crate::time_utils::format_utc_rfc3339;
use std::collections::BTreeMap;

/// Check whether `candidate` sets a new personal record.
///
/// `history` may contain other exercises and may include the candidate
/// itself; both are filtered out. When both dimensions improve, weight is
/// reported.
pub fn detect_personal_record(
    history: &[ExerciseEntry],
    candidate: &ExerciseEntry,
) -> PersonalRecordCheck {
    let prior: Vec<&ExerciseEntry> = history
        .iter()
        .filter(|e| e.id != candidate.id && e.is_named(&candidate.name))
        .collect();

    // First-ever entry for this name always counts.
    if prior.is_empty() {
        let dimension = if candidate.max_weight() <= 0.0 && candidate.duration().is_some() {
            RecordDimension::Time
        } else {
            RecordDimension::Weight
        };
        return PersonalRecordCheck::new_record(dimension);
    }

    let weight = candidate.max_weight();
    if weight > 0.0 {
        let best_prior = best_value(prior.iter().map(|e| e.max_weight()));
        if best_prior.is_none_or(|best| weight > best) {
            return PersonalRecordCheck::new_record(RecordDimension::Weight);
        }
    }

    if let Some(duration) = candidate.duration() {
        let best_prior = best_value(prior.iter().filter_map(|e| e.duration()));
        if best_prior.is_none_or(|best| duration > best) {
            return PersonalRecordCheck::new_record(RecordDimension::Time);
        }
    }

    PersonalRecordCheck::none()
}

/// Largest positive value, if any.
fn best_value(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.filter(|v| *v > 0.0).reduce(f64::max)
}

/// Best-ever weight and duration for every exercise name in `entries`.
///
/// Sorted by exercise name. Ties keep the earliest achievement.
pub fn personal_bests(entries: &[ExerciseEntry]) -> Vec<PersonalBest> {
    let mut sorted: Vec<&ExerciseEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.performed_at);

    let mut bests: BTreeMap<String, PersonalBest> = BTreeMap::new();
    for entry in sorted {
        let best = bests
            .entry(name_key(&entry.name))
            .or_insert_with(|| PersonalBest {
                name: entry.name.trim().to_string(),
                category: entry.category,
                best_weight: None,
                best_weight_at: None,
                best_duration_minutes: None,
                best_duration_at: None,
                sessions: 0,
            });

        best.sessions += 1;

        let weight = entry.max_weight();
        if weight > 0.0 && best.best_weight.is_none_or(|b| weight > b) {
            best.best_weight = Some(weight);
            best.best_weight_at = Some(format_utc_rfc3339(entry.performed_at));
        }

        if let Some(duration) = entry.duration() {
            if best.best_duration_minutes.is_none_or(|b| duration > b) {
                best.best_duration_minutes = Some(duration);
                best.best_duration_at = Some(format_utc_rfc3339(entry.performed_at));
            }
        }
    }

    bests.into_values().collect()
}
