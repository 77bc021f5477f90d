//! Weekday names and their offsets from Monday.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Canonical weekday names, indexed by offset from Monday.
pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// The days a slot can be created on.
pub const WORK_DAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// How stored day names are compared against the canonical ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayMatching {
    /// "Monday" matches, "monday" does not.
    #[default]
    Exact,
    CaseInsensitive,
}

/// Offset in days from Monday for a weekday name, if it is one of the seven
/// canonical names.
pub fn day_offset(name: &str, matching: DayMatching) -> Option<i64> {
    DAY_NAMES
        .iter()
        .position(|candidate| match matching {
            DayMatching::Exact => *candidate == name,
            DayMatching::CaseInsensitive => candidate.eq_ignore_ascii_case(name.trim()),
        })
        .map(|idx| idx as i64)
}

/// English name of a weekday, as stored in slots.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    DAY_NAMES[weekday.num_days_from_monday() as usize]
}
