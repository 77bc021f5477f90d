//! Terminal rendering for slots and the week grid.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use owo_colors::OwoColorize;

use timetable_core::clock::{duration_hours, format_clock, format_duration};
use timetable_core::day::weekday_name;
use timetable_core::{CalendarEvent, Slot, WeekView};

const TIME_COLUMN: usize = 7;
const DAY_COLUMN: usize = 14;

/// One line per slot: "Monday: 09:00 - 10:00 (1 hr) → Lecture @ K609 [A, B]"
pub fn slot_line(slot: &Slot) -> String {
    let duration = match duration_hours(&slot.start_time, &slot.end_time) {
        Ok(hours) => format!(" ({})", format_duration(hours)),
        Err(_) => String::new(),
    };

    let mut line = format!(
        "{}: {} - {}{} → {}",
        slot.day, slot.start_time, slot.end_time, duration, slot.task
    );

    if let Some(location) = slot.location.as_deref().filter(|l| !l.is_empty()) {
        line.push_str(&format!(" @ {}", location));
    }

    let staff = slot.staff();
    if !staff.is_empty() {
        line.push_str(&format!(" [{}]", staff.join(", ")));
    }

    line
}

/// What to draw in one cell of the week grid
#[derive(Debug, PartialEq)]
pub enum Cell<'a> {
    Empty,
    /// The event starts in this row
    Start(&'a CalendarEvent),
    /// The event started in an earlier row
    Continues,
}

/// Rows of the week grid: one per step from `day_start` to `day_end`, one
/// cell per work day.
pub fn week_cells<'a>(
    events: &'a [CalendarEvent],
    view: &WeekView,
) -> Vec<(NaiveTime, Vec<Cell<'a>>)> {
    let step = Duration::minutes(i64::from(view.step_minutes.max(1)));
    let dates = view.work_dates();
    let mut rows = Vec::new();

    let mut row_start = view.day_start;
    while row_start < view.day_end {
        let row_end = row_start + step;
        let cells = dates
            .iter()
            .map(|date| cell_at(events, *date, row_start, row_end))
            .collect();
        rows.push((row_start, cells));

        // NaiveTime wraps at midnight
        if row_end <= row_start {
            break;
        }
        row_start = row_end;
    }

    rows
}

fn cell_at(events: &[CalendarEvent], date: NaiveDate, from: NaiveTime, to: NaiveTime) -> Cell<'_> {
    let on_day = events.iter().filter(|e| e.start.date() == date);

    for event in on_day {
        let start = event.start.time();
        let end = event.end.time();

        if start >= from && start < to {
            return Cell::Start(event);
        }
        if start < from && end > from {
            return Cell::Continues;
        }
    }

    Cell::Empty
}

fn fit(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width - 1).collect();
    format!("{:<width$}", truncated, width = width)
}

/// Render the week grid with a header row of day names.
pub fn render_week(events: &[CalendarEvent], view: &WeekView) -> String {
    let mut lines = Vec::new();

    let mut header = " ".repeat(TIME_COLUMN);
    for date in view.work_dates() {
        header.push_str(&fit(weekday_name(date.weekday()), DAY_COLUMN));
    }
    lines.push(header.bold().to_string());

    for (time, cells) in week_cells(events, view) {
        let mut line = format!("{:<width$}", format_clock(time), width = TIME_COLUMN)
            .dimmed()
            .to_string();

        for cell in cells {
            let text = match cell {
                Cell::Empty => " ".repeat(DAY_COLUMN),
                Cell::Start(event) => fit(&event.task, DAY_COLUMN).green().to_string(),
                Cell::Continues => fit("┆", DAY_COLUMN).green().dimmed().to_string(),
            };
            line.push_str(&text);
        }

        lines.push(line);
    }

    lines.join("\n")
}

/// Render events grouped by day with their details, for below the grid.
pub fn render_event_list(events: &[CalendarEvent]) -> String {
    let mut sorted: Vec<&CalendarEvent> = events.iter().collect();
    sorted.sort_by_key(|e| e.start);

    let mut lines = Vec::new();
    let mut current_day: Option<NaiveDate> = None;

    for event in sorted {
        let date = event.start.date();
        if current_day != Some(date) {
            lines.push(weekday_name(date.weekday()).bold().to_string());
            current_day = Some(date);
        }

        let mut details = vec![format_duration(event.duration)];
        if let Some(location) = event.location.as_deref().filter(|l| !l.is_empty()) {
            details.push(location.to_string());
        }
        let staff = event.staff();
        if !staff.is_empty() {
            details.push(staff.join(", "));
        }

        lines.push(format!(
            "  {}-{} {} {} {}",
            format_clock(event.start.time()),
            format_clock(event.end.time()),
            event.task,
            format!("({})", details.join(" · ")).dimmed(),
            event.id.dimmed()
        ));
    }

    if lines.is_empty() {
        return "No slots".dimmed().to_string();
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use timetable_core::mapper::map_slots_to_events;

    fn slot(day: &str, start: &str, end: &str, task: &str) -> Slot {
        Slot {
            id: format!("{day}-{start}"),
            user_id: None,
            day: day.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            task: task.to_string(),
            location: Some("K609".to_string()),
            staff1: Some("A".to_string()),
            staff2: Some("B".to_string()),
        }
    }

    #[test]
    fn slot_line_shows_everything_set() {
        let line = slot_line(&slot("Monday", "09:00", "11:00", "Lecture"));
        assert_eq!(line, "Monday: 09:00 - 11:00 (2 hrs) → Lecture @ K609 [A, B]");
    }

    #[test]
    fn slot_line_skips_missing_details() {
        let mut s = slot("Friday", "13:00", "14:00", "Lab");
        s.location = None;
        s.staff1 = None;
        s.staff2 = Some("B".to_string());
        assert_eq!(slot_line(&s), "Friday: 13:00 - 14:00 (1 hr) → Lab [B]");
    }

    #[test]
    fn slot_line_tolerates_bad_times() {
        let s = slot("Friday", "", "", "Lab");
        assert_eq!(slot_line(&s), "Friday:  -  → Lab @ K609 [A, B]");
    }

    #[test]
    fn grid_has_one_row_per_step() {
        let view = WeekView::default();
        let rows = week_cells(&[], &view);
        assert_eq!(rows.len(), 20);
        assert_eq!(format_clock(rows[0].0), "08:00");
        assert_eq!(format_clock(rows[19].0), "17:30");
        assert!(rows.iter().all(|(_, cells)| cells.len() == 5));
    }

    #[test]
    fn grid_marks_start_and_continuation() {
        let view = WeekView::default();
        let events = map_slots_to_events(
            &[slot("Tuesday", "09:00", "10:30", "Lecture")],
            &view.week,
        );
        let rows = week_cells(&events, &view);

        // 09:00 is row 2, Tuesday is column 1
        assert_eq!(rows[2].1[1], Cell::Start(&events[0]));
        assert_eq!(rows[3].1[1], Cell::Continues);
        assert_eq!(rows[4].1[1], Cell::Continues);
        assert_eq!(rows[5].1[1], Cell::Empty);
        assert_eq!(rows[2].1[0], Cell::Empty);
    }

    #[test]
    fn rendered_week_contains_tasks() {
        let view = WeekView::default();
        let events = map_slots_to_events(&[slot("Friday", "16:00", "17:00", "Seminar")], &view.week);
        let out = render_week(&events, &view);

        assert!(out.contains("Seminar"));
        assert!(out.contains("Friday"));
        assert_eq!(out.lines().count(), 21);
    }

    #[test]
    fn long_task_names_are_truncated() {
        assert_eq!(fit("Introduction to Algorithms", DAY_COLUMN).chars().count(), DAY_COLUMN);
        assert_eq!(fit("Lab", 6), "Lab   ");
    }
}
