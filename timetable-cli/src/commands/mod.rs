pub mod add;
pub mod delete;
pub mod list;
pub mod locations;
pub mod reschedule;
pub mod week;

use anyhow::Result;
use timetable_core::mapper::map_slot_to_event;
use timetable_core::sync::SyncController;
use timetable_core::{CalendarEvent, WeekView};

use crate::client::Client;

pub type Controller = SyncController<Client>;

/// The loaded slot with this id, placed on the week grid.
fn event_for(controller: &Controller, view: &WeekView, id: &str) -> Result<CalendarEvent> {
    let Some(slot) = controller.slots().get(id) else {
        let known: Vec<_> = controller.slots().iter().map(|s| s.id.as_str()).collect();
        anyhow::bail!(
            "Slot '{}' not found. Known slots: {}",
            id,
            if known.is_empty() { "(none)".to_string() } else { known.join(", ") }
        );
    };

    Ok(map_slot_to_event(slot, &view.week)?)
}
