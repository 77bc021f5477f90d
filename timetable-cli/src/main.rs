mod client;
mod commands;
mod render;

use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use timetable_core::config::TimetableConfig;
use timetable_core::day::WORK_DAYS;
use timetable_core::sync::SyncController;
use tracing_subscriber::EnvFilter;

use crate::client::Client;
use crate::commands::add::AddArgs;

#[derive(Parser)]
#[command(name = "timetable")]
#[command(about = "View and edit the weekly timetable")]
struct Cli {
    /// Server URL (defaults to server_url from the config file)
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the work-week grid
    Week {
        /// Also show the grid for this location
        #[arg(short, long)]
        location: Option<String>,
    },
    /// List slots, one per line
    List {
        /// Only slots owned by this user
        #[arg(short, long)]
        user: Option<String>,
    },
    /// List the locations in use
    Locations,
    /// Add a slot
    Add {
        #[arg(short, long, value_parser = PossibleValuesParser::new(WORK_DAYS))]
        day: String,

        /// Start time (e.g. "08:00")
        #[arg(short, long)]
        start: String,

        /// Length in hours
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i64).range(1..=4))]
        duration: i64,

        #[arg(short, long)]
        task: String,

        #[arg(short, long)]
        location: String,

        #[arg(long)]
        staff1: String,

        #[arg(long)]
        staff2: String,

        /// Owner tag
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Move a slot to another day and start time, keeping its length
    Move {
        id: String,

        #[arg(short, long)]
        day: String,

        /// New start time (e.g. "14:00")
        #[arg(short, long)]
        start: String,
    },
    /// Change the end time of a slot
    Resize {
        id: String,

        /// New end time (e.g. "15:30")
        #[arg(short, long)]
        end: String,
    },
    /// Delete a slot
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = TimetableConfig::load()?;
    let view = config.week_view()?;

    let server_url = cli.server.unwrap_or_else(|| config.server_url.clone());
    let mut controller = SyncController::new(Client::new(server_url));

    match cli.command {
        Commands::Week { location } => commands::week::run(&mut controller, &view, location).await,
        Commands::List { user } => commands::list::run(&mut controller, user).await,
        Commands::Locations => commands::locations::run(&mut controller).await,
        Commands::Add {
            day,
            start,
            duration,
            task,
            location,
            staff1,
            staff2,
            user,
        } => {
            let args = AddArgs {
                day,
                start,
                duration,
                task,
                location,
                staff1,
                staff2,
                user,
            };
            commands::add::run(&mut controller, &view, args).await
        }
        Commands::Move { id, day, start } => {
            commands::reschedule::run_move(&mut controller, &view, &id, &day, &start).await
        }
        Commands::Resize { id, end } => {
            commands::reschedule::run_resize(&mut controller, &view, &id, &end).await
        }
        Commands::Delete { id } => commands::delete::run(&mut controller, &id).await,
    }
}
