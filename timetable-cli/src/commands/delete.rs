use anyhow::Result;
use owo_colors::OwoColorize;

use super::Controller;

pub async fn run(controller: &mut Controller, id: &str) -> Result<()> {
    controller.load().await?;

    let label = controller
        .slots()
        .get(id)
        .map(|slot| format!("{} ({} {})", slot.task, slot.day, slot.start_time))
        .unwrap_or_else(|| id.to_string());

    controller.delete(id).await?;

    println!("{}", format!("  Deleted: {}", label).red());
    println!(
        "{}",
        format!("  {} slot(s) remaining", controller.slots().len()).dimmed()
    );

    Ok(())
}
