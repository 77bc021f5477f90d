use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use timetable_core::clock::add_hours_to_time;
use timetable_core::{NewSlot, WeekView};

use super::Controller;
use super::week::print_week;

pub struct AddArgs {
    pub day: String,
    pub start: String,
    pub duration: i64,
    pub task: String,
    pub location: String,
    pub staff1: String,
    pub staff2: String,
    pub user: Option<String>,
}

impl AddArgs {
    /// Request body, with the end time derived from start and duration.
    pub fn into_new_slot(self) -> Result<NewSlot> {
        let end_time = add_hours_to_time(&self.start, self.duration)
            .with_context(|| format!("Invalid start time '{}'", self.start))?;

        Ok(NewSlot {
            user_id: self.user,
            day: self.day,
            start_time: self.start,
            end_time,
            duration: None,
            task: self.task,
            location: Some(self.location),
            staff1: Some(self.staff1),
            staff2: Some(self.staff2),
        })
    }
}

pub async fn run(controller: &mut Controller, view: &WeekView, args: AddArgs) -> Result<()> {
    let new = args.into_new_slot()?;

    controller.load().await?;
    let slot = controller.create(new).await?;

    println!(
        "{}",
        format!("  Created: {} ({} {}-{})", slot.task, slot.day, slot.start_time, slot.end_time).green()
    );
    println!();
    print_week(controller, view, None);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(start: &str, duration: i64) -> AddArgs {
        AddArgs {
            day: "Monday".to_string(),
            start: start.to_string(),
            duration,
            task: "Lecture".to_string(),
            location: "K609".to_string(),
            staff1: "A".to_string(),
            staff2: "B".to_string(),
            user: None,
        }
    }

    #[test]
    fn end_time_is_start_plus_duration() {
        let new = args("09:00", 1).into_new_slot().unwrap();
        assert_eq!(new.start_time, "09:00");
        assert_eq!(new.end_time, "10:00");
        assert_eq!(new.location.as_deref(), Some("K609"));
        assert_eq!(new.duration, None);
    }

    #[test]
    fn bad_start_time_is_reported() {
        let err = args("nine", 2).into_new_slot().unwrap_err();
        assert!(err.to_string().contains("nine"));
    }
}
