//! Wall-clock arithmetic for incident timestamps.
//!
//! Wizard choices arrive as a calendar day plus hour/minute in the configured
//! business time zone; storage is UTC. Overnight incidents (end before start
//! on the same day) roll the end forward by one day.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use lossdesk_core::DomainError;

/// Combine a calendar day with a wall-clock time in `tz`, returning UTC.
///
/// Folded local times (DST overlap) resolve to the earlier instant;
/// nonexistent local times (DST gap) are a validation error.
pub fn combine(tz: Tz, day: NaiveDate, hour: u32, minute: u32) -> Result<DateTime<Utc>, DomainError> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
        DomainError::validation(format!("not a wall-clock time: {hour:02}:{minute:02}"))
    })?;
    let local = day.and_time(time);
    let resolved = local.and_local_timezone(tz).earliest().ok_or_else(|| {
        DomainError::validation(format!("{local} does not exist in {tz}"))
    })?;
    Ok(resolved.with_timezone(&Utc))
}

/// Roll `end` forward one day when it lands before `start` (overnight incident).
pub fn roll_forward_overnight(start: DateTime<Utc>, end: DateTime<Utc>) -> DateTime<Utc> {
    if end < start { end + Duration::days(1) } else { end }
}

/// Whole minutes between `start` and `end` (floored).
pub fn duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_seconds().div_euclid(60)
}

/// Render a minute count: `"45 min"` below an hour, `"2 h 15 min"` above.
pub fn format_duration(minutes: i64) -> String {
    if minutes < 60 {
        format!("{minutes} min")
    } else {
        format!("{} h {} min", minutes / 60, minutes % 60)
    }
}
