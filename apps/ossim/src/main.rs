//! ossim - deadlock detection and resolution simulator
//!
//! Spawns the coordinator and renders its event stream until the
//! simulation drains.

mod cli;
mod error;
mod events;

use crate::cli::Cli;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use ossim_config::Config;
use ossim_coordinator::Coordinator;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = run(cli).await {
        error!("simulation error: {e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    info!("starting ossim v{}", env!("CARGO_PKG_VERSION"));

    // Precedence: defaults < file < environment < CLI flags
    let mut config = Config::load_or_default(cli.config.as_deref()).await?;
    config.merge_env()?;
    cli.apply(&mut config);
    config.validate()?;

    let (event_tx, mut event_rx) = ossim_events::channel();
    let coordinator = Coordinator::new(config, Some(event_tx));
    let simulation = tokio::spawn(coordinator.run());

    // The event channel closes when the coordinator finishes and drops
    // its sender, so this loop drains everything the run produced.
    let mut handler = EventHandler::new(cli.json);
    while let Some(event) = event_rx.recv().await {
        handler.handle(&event);
    }

    let summary = simulation.await??;
    handler.finish(&summary);
    Ok(())
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
