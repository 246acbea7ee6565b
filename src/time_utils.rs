// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and calendar-day math.
//!
//! All calendar-day grouping (streaks, chart buckets, comparisons) is done
//! in a fixed UTC offset chosen per request, so a workout logged at 23:30
//! local time lands on the local day rather than the UTC one.

use crate::config::MAX_UTC_OFFSET_MINUTES;
use crate::error::{AppError, Result};
use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc,
};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Resolve a request's `tz_offset` (minutes east of UTC) to a fixed offset.
pub fn resolve_offset(requested: Option<i32>, default_minutes: i32) -> Result<FixedOffset> {
    let minutes = requested.unwrap_or(default_minutes);
    if minutes.abs() > MAX_UTC_OFFSET_MINUTES {
        return Err(AppError::BadRequest(format!(
            "Invalid 'tz_offset': must be between -{0} and {0} minutes",
            MAX_UTC_OFFSET_MINUTES
        )));
    }

    FixedOffset::east_opt(minutes * 60)
        .ok_or_else(|| AppError::BadRequest("Invalid 'tz_offset'".to_string()))
}

/// Calendar day of a timestamp in the given offset.
pub fn local_day(ts: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    ts.with_timezone(&offset).date_naive()
}

/// UTC instants bounding a local calendar day: `[start, end)`.
pub fn day_bounds(day: NaiveDate, offset: FixedOffset) -> (DateTime<Utc>, DateTime<Utc>) {
    let midnight = day.and_time(NaiveTime::MIN);
    // Fixed offsets never produce ambiguous local times.
    let start = offset
        .from_local_datetime(&midnight)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight));
    (start, start + Duration::days(1))
}

/// Parse a `YYYY-MM-DD` query parameter.
pub fn parse_day(raw: &str, param: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::BadRequest(format!(
            "Invalid '{}' parameter: must be a YYYY-MM-DD date",
            param
        ))
    })
}

/// Parse an optional RFC3339 timestamp from a request body.
pub fn parse_timestamp(raw: Option<&str>, field: &str) -> Result<Option<DateTime<Utc>>> {
    raw.map(|value| {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| {
                AppError::BadRequest(format!(
                    "Invalid '{}': must be an RFC3339 datetime",
                    field
                ))
            })
    })
    .transpose()
}
