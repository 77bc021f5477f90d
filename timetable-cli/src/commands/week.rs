use anyhow::Result;
use owo_colors::OwoColorize;
use timetable_core::WeekView;

use super::Controller;
use crate::render::{render_event_list, render_week};

pub async fn run(controller: &mut Controller, view: &WeekView, location: Option<String>) -> Result<()> {
    controller.load().await?;
    print_week(controller, view, location.as_deref());
    Ok(())
}

/// Print the main grid and, when a location is given, the grid for that
/// location, from the controller's current list.
pub fn print_week(controller: &Controller, view: &WeekView, location: Option<&str>) {
    let events = controller.events(&view.week);
    println!("{}", "Weekly Timetable".bold());
    println!("{}", render_week(&events, view));
    println!();
    println!("{}", render_event_list(&events));

    if let Some(location) = location {
        let scoped = controller.location_events(location, &view.week);
        println!();
        println!("{}", format!("Timetable for {}", location).bold());
        println!("{}", render_week(&scoped, view));
    }
}
