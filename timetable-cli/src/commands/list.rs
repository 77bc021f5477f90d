use anyhow::Result;
use owo_colors::OwoColorize;

use super::Controller;
use crate::render::slot_line;

pub async fn run(controller: &mut Controller, user: Option<String>) -> Result<()> {
    let slots = match user.as_deref() {
        Some(user) => controller.load_for_user(user).await?,
        None => controller.load().await?,
    };

    if slots.is_empty() {
        println!("{}", "No slots found".dimmed());
        return Ok(());
    }

    for slot in slots {
        println!("{}  {}", slot_line(slot), slot.id.dimmed());
    }

    Ok(())
}
