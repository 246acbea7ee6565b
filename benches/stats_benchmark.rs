use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use workout_tracker::models::{ExerciseCategory, ExerciseEntry, LibraryFilter, SetRecord};
use workout_tracker::services::{comparison, progress, records, streaks, CatalogService};

/// A few years of near-daily squats with a rest day every fourth day.
fn history(days: i64) -> Vec<ExerciseEntry> {
    let start: DateTime<Utc> = Utc.with_ymd_and_hms(2022, 1, 1, 7, 30, 0).unwrap();
    (0..days)
        .filter(|d| d % 4 != 3)
        .map(|d| {
            let performed_at = start + Duration::days(d);
            ExerciseEntry {
                id: format!("entry-{}", d),
                user_id: "bench_user".to_string(),
                name: "Back Squat".to_string(),
                category: ExerciseCategory::Strength,
                sets: (0..5)
                    .map(|s| SetRecord {
                        reps: 5,
                        weight: 60.0 + (d % 90) as f64 * 0.5 + s as f64 * 2.5,
                        notes: None,
                    })
                    .collect(),
                duration_minutes: None,
                performed_at,
                notes: None,
                created_at: performed_at.to_rfc3339(),
                updated_at: None,
            }
        })
        .collect()
}

fn benchmark_aggregations(c: &mut Criterion) {
    let entries = history(3 * 365);
    let offset = FixedOffset::west_opt(8 * 3600).unwrap();
    let now = entries.last().unwrap().performed_at;
    let candidate = {
        let mut e = entries.last().unwrap().clone();
        e.id = "candidate".to_string();
        e.sets[0].weight = 500.0;
        e
    };
    let first = entries[10].performed_at.with_timezone(&offset).date_naive();
    let second = now.with_timezone(&offset).date_naive();

    let mut group = c.benchmark_group("three_years_of_history");

    group.bench_function("personal_record_check", |b| {
        b.iter(|| records::detect_personal_record(black_box(&entries), black_box(&candidate)))
    });

    group.bench_function("personal_bests", |b| {
        b.iter(|| records::personal_bests(black_box(&entries)))
    });

    group.bench_function("overview", |b| {
        b.iter(|| streaks::summarize(black_box(&entries), now, offset))
    });

    group.bench_function("progress_series", |b| {
        b.iter(|| progress::build_progress_series("Back Squat", black_box(&entries), offset))
    });

    group.bench_function("compare_days", |b| {
        b.iter(|| comparison::compare_days("Back Squat", black_box(&entries), first, second, offset))
    });

    group.finish();
}

fn benchmark_library_search(c: &mut Criterion) {
    let catalog = CatalogService::load_from_files(
        "data/exercise_library.json",
        "data/prebuilt_templates.json",
    )
    .expect("Failed to load catalog");
    let filter = LibraryFilter {
        q: Some("squat".to_string()),
        ..Default::default()
    };

    c.bench_function("library_text_search", |b| {
        b.iter(|| catalog.search(black_box(&filter)))
    });
}

criterion_group!(benches, benchmark_aggregations, benchmark_library_search);
criterion_main!(benches);
