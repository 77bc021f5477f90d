use anyhow::Result;
use owo_colors::OwoColorize;

use super::Controller;

pub async fn run(controller: &mut Controller) -> Result<()> {
    let slots = controller.load().await?;
    let locations = slots.locations();

    if locations.is_empty() {
        println!("{}", "No locations yet".dimmed());
        return Ok(());
    }

    for location in locations {
        let count = slots.at_location(&location).len();
        println!("{} {}", location, format!("({})", count).dimmed());
    }

    Ok(())
}
