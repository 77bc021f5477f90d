//! Moving and resizing slots on the week grid.

use anyhow::Result;
use owo_colors::OwoColorize;
use timetable_core::WeekView;
use timetable_core::clock::parse_clock;

use super::{Controller, event_for};
use crate::render::slot_line;

/// Drag a slot to another day and start time, keeping its length.
pub async fn run_move(
    controller: &mut Controller,
    view: &WeekView,
    id: &str,
    day: &str,
    start: &str,
) -> Result<()> {
    let start = parse_clock(start)?;

    controller.load().await?;
    let event = event_for(controller, view, id)?;
    let (new_start, new_end) = view.drop_event(&event, day, start)?;

    let slot = controller.reschedule(id, new_start, new_end).await?;
    println!("{} {}", "  Moved:".yellow(), slot_line(&slot));

    Ok(())
}

/// Drag the end of a slot, keeping its start.
pub async fn run_resize(controller: &mut Controller, view: &WeekView, id: &str, end: &str) -> Result<()> {
    let end = parse_clock(end)?;

    controller.load().await?;
    let event = event_for(controller, view, id)?;
    let (new_start, new_end) = view.resize_event(&event, end)?;

    let slot = controller.reschedule(id, new_start, new_end).await?;
    println!("{} {}", "  Resized:".yellow(), slot_line(&slot));

    Ok(())
}
