//! Wall-clock "HH:MM" helpers.
//!
//! Slots store their times as plain 24-hour strings with no date and no
//! timezone. Everything that needs arithmetic on them goes through here.

use chrono::{Duration, NaiveTime, Timelike};

use crate::error::{TimetableError, TimetableResult};

const CLOCK_FORMAT: &str = "%H:%M";

/// Parse an "HH:MM" string. A single-digit hour ("9:30") is accepted.
pub fn parse_clock(s: &str) -> TimetableResult<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), CLOCK_FORMAT)
        .map_err(|_| TimetableError::InvalidTime(s.to_string()))
}

/// Format a time as zero-padded "HH:MM".
pub fn format_clock(time: NaiveTime) -> String {
    time.format(CLOCK_FORMAT).to_string()
}

/// Minutes since midnight.
pub fn minutes_of_day(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

/// Add a whole number of hours to an "HH:MM" string.
///
/// Wraps around midnight like a wall clock, so "23:00" + 2 is "01:00". Any
/// hour count is accepted; only its remainder modulo a day matters.
pub fn add_hours_to_time(time: &str, hours: i64) -> TimetableResult<String> {
    let start = parse_clock(time)?;
    let (end, _) = start.overflowing_add_signed(Duration::hours(hours.rem_euclid(24)));
    Ok(format_clock(end))
}

/// Length of the span between two "HH:MM" strings, in hours.
///
/// Not clamped: an end before the start gives a negative value.
pub fn duration_hours(start: &str, end: &str) -> TimetableResult<f64> {
    let start = parse_clock(start)?;
    let end = parse_clock(end)?;
    Ok((minutes_of_day(end) - minutes_of_day(start)) as f64 / 60.0)
}

/// Human-readable duration such as "1 hr", "1.5 hrs" or "-2 hrs".
pub fn format_duration(hours: f64) -> String {
    let suffix = if hours > 1.0 || hours < 0.0 { "hrs" } else { "hr" };
    format!("{} {}", hours, suffix)
}
