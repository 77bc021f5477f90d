mod routes;
mod singleton;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use timetable_core::config::TimetableConfig;
use timetable_core::store::{FileStore, MemoryStore, SlotStore};
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "timetable-server")]
#[command(about = "Serve the weekly timetable REST API")]
struct Args {
    /// Address to listen on (e.g. "127.0.0.1:5001")
    #[arg(short, long)]
    listen: Option<String>,

    /// Directory holding the slot collection
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Keep slots in memory only; nothing is written to disk
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = TimetableConfig::load()?;

    let listen = args.listen.unwrap_or_else(|| config.listen.clone());
    let data_dir = args.data_dir.unwrap_or_else(|| config.data_path());

    // The lock must outlive the server
    let mut _lock = None;
    let store: Arc<dyn SlotStore> = if args.memory {
        tracing::info!("using in-memory slot store");
        Arc::new(MemoryStore::new())
    } else {
        _lock = Some(singleton::acquire_lock(&data_dir)?);
        tracing::info!(data_dir = %data_dir.display(), "using file slot store");
        Arc::new(FileStore::open(&data_dir)?)
    };

    let app = routes::app(AppState::new(store, config.delete_policy));

    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .with_context(|| format!("Failed to bind {}", listen))?;
    tracing::info!("timetable-server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
