//! Slot-to-event mapping.
//!
//! Slots only know a weekday name and two wall-clock strings. To put them on
//! a calendar grid they are projected onto a fixed reference week, and after
//! an event is dragged or resized the new date-times are projected back into
//! day/time strings.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::Serialize;

use crate::clock::{format_clock, minutes_of_day, parse_clock};
use crate::day::{DayMatching, WORK_DAYS, day_offset, weekday_name};
use crate::error::{TimetableError, TimetableResult};
use crate::slot::{Slot, SlotPatch};

/// Monday of the week every slot is projected onto.
pub const DEFAULT_REFERENCE_MONDAY: &str = "2020-01-06";

/// A fixed Monday used to turn "Tuesday 14:00" into an absolute date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceWeek {
    monday: NaiveDate,
    matching: DayMatching,
}

impl Default for ReferenceWeek {
    fn default() -> Self {
        ReferenceWeek {
            monday: NaiveDate::from_ymd_opt(2020, 1, 6).expect("2020-01-06 is a valid date"),
            matching: DayMatching::Exact,
        }
    }
}

impl ReferenceWeek {
    pub fn new(monday: NaiveDate) -> TimetableResult<Self> {
        if monday.weekday() != Weekday::Mon {
            return Err(TimetableError::InvalidDay(format!(
                "reference date {} is a {}, not a Monday",
                monday,
                weekday_name(monday.weekday())
            )));
        }

        Ok(ReferenceWeek {
            monday,
            matching: DayMatching::Exact,
        })
    }

    pub fn with_day_matching(mut self, matching: DayMatching) -> Self {
        self.matching = matching;
        self
    }

    pub fn monday(&self) -> NaiveDate {
        self.monday
    }

    pub fn day_matching(&self) -> DayMatching {
        self.matching
    }

    /// Date of a named weekday within this week.
    ///
    /// Unrecognised names land on Monday.
    pub fn date_of(&self, day: &str) -> NaiveDate {
        let offset = day_offset(day, self.matching).unwrap_or_else(|| {
            tracing::debug!(day, "unknown day name, placing on Monday");
            0
        });
        self.monday + Duration::days(offset)
    }

    /// Whether a date falls within Monday..=Sunday of this week.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.monday && date < self.monday + Duration::days(7)
    }
}

/// A slot placed on the reference week, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub id: String,
    pub task: String,
    /// Length in hours, derived from the slot's times.
    pub duration: f64,
    pub location: Option<String>,
    pub staff1: Option<String>,
    pub staff2: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl CalendarEvent {
    pub fn staff(&self) -> Vec<&str> {
        [&self.staff1, &self.staff2]
            .into_iter()
            .filter_map(|s| s.as_deref())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Project a single slot onto the reference week.
pub fn map_slot_to_event(slot: &Slot, week: &ReferenceWeek) -> TimetableResult<CalendarEvent> {
    let date = week.date_of(&slot.day);
    let start_time = parse_clock(&slot.start_time)?;
    let end_time = parse_clock(&slot.end_time)?;

    let duration = (minutes_of_day(end_time) - minutes_of_day(start_time)) as f64 / 60.0;

    Ok(CalendarEvent {
        id: slot.id.clone(),
        task: slot.task.clone(),
        duration,
        location: slot.location.clone(),
        staff1: slot.staff1.clone(),
        staff2: slot.staff2.clone(),
        start: date.and_time(start_time),
        end: date.and_time(end_time),
    })
}

/// Project every slot onto the reference week.
///
/// Slots whose times can't be parsed are left out of the result.
pub fn map_slots_to_events(slots: &[Slot], week: &ReferenceWeek) -> Vec<CalendarEvent> {
    slots
        .iter()
        .filter_map(|slot| match map_slot_to_event(slot, week) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::warn!(id = %slot.id, "skipping slot: {}", e);
                None
            }
        })
        .collect()
}

/// Day and times of a slot, recovered from an absolute date-time range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotTimes {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

/// Inverse of the mapping: weekday of `start`, and both times as "HH:MM".
pub fn slot_times_from_range(start: NaiveDateTime, end: NaiveDateTime) -> SlotTimes {
    SlotTimes {
        day: weekday_name(start.weekday()).to_string(),
        start_time: format_clock(start.time()),
        end_time: format_clock(end.time()),
    }
}

impl From<SlotTimes> for SlotPatch {
    fn from(times: SlotTimes) -> Self {
        SlotPatch {
            day: Some(times.day),
            start_time: Some(times.start_time),
            end_time: Some(times.end_time),
            ..Default::default()
        }
    }
}

/// The bounds a week calendar applies when events are dragged or resized:
/// only the work days of the reference week, only between `day_start` and
/// `day_end`, snapped to `step_minutes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekView {
    pub week: ReferenceWeek,
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    pub step_minutes: u32,
}

impl Default for WeekView {
    fn default() -> Self {
        WeekView {
            week: ReferenceWeek::default(),
            day_start: NaiveTime::from_hms_opt(8, 0, 0).expect("08:00 is a valid time"),
            day_end: NaiveTime::from_hms_opt(18, 0, 0).expect("18:00 is a valid time"),
            step_minutes: 30,
        }
    }
}

impl WeekView {
    /// Dates of the visible work days.
    pub fn work_dates(&self) -> Vec<NaiveDate> {
        (0..WORK_DAYS.len() as i64)
            .map(|offset| self.week.monday() + Duration::days(offset))
            .collect()
    }

    /// Move an event to another day and start time, keeping its length.
    pub fn drop_event(
        &self,
        event: &CalendarEvent,
        day: &str,
        start: NaiveTime,
    ) -> TimetableResult<(NaiveDateTime, NaiveDateTime)> {
        let offset = day_offset(day, self.week.day_matching())
            .filter(|offset| (*offset as usize) < WORK_DAYS.len())
            .ok_or_else(|| TimetableError::InvalidDay(format!("'{}' is not a work day", day)))?;

        let date = self.week.monday() + Duration::days(offset);
        let new_start = date.and_time(self.snap(start)?);
        let new_end = new_start + (event.end - event.start);

        self.check_range(new_start, new_end)?;
        Ok((new_start, new_end))
    }

    /// Move the end of an event, keeping its start.
    pub fn resize_event(
        &self,
        event: &CalendarEvent,
        end: NaiveTime,
    ) -> TimetableResult<(NaiveDateTime, NaiveDateTime)> {
        let new_end = event.start.date().and_time(self.snap(end)?);

        self.check_range(event.start, new_end)?;
        Ok((event.start, new_end))
    }

    /// Round a time to the nearest step.
    fn snap(&self, time: NaiveTime) -> TimetableResult<NaiveTime> {
        let step = i64::from(self.step_minutes.max(1));
        let minutes = minutes_of_day(time);
        let snapped = (minutes + step / 2) / step * step;

        NaiveTime::from_num_seconds_from_midnight_opt((snapped * 60) as u32, 0).ok_or_else(|| {
            TimetableError::OutOfView(format!("{} rounds past midnight", format_clock(time)))
        })
    }

    fn check_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> TimetableResult<()> {
        if end <= start {
            return Err(TimetableError::OutOfView(format!(
                "end {} is not after start {}",
                format_clock(end.time()),
                format_clock(start.time())
            )));
        }

        if start.date() != end.date() || !self.work_dates().contains(&start.date()) {
            return Err(TimetableError::OutOfView(format!(
                "{} is not a visible day of the week of {}",
                end.date(),
                self.week.monday()
            )));
        }

        if start.time() < self.day_start || end.time() > self.day_end {
            return Err(TimetableError::OutOfView(format!(
                "{}-{} is outside {}-{}",
                format_clock(start.time()),
                format_clock(end.time()),
                format_clock(self.day_start),
                format_clock(self.day_end)
            )));
        }

        Ok(())
    }
}
