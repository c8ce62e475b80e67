//! Command-line interface definition

use clap::Parser;
use std::path::PathBuf;

/// Deadlock detection and resolution simulator
#[derive(Debug, Parser)]
#[command(name = "ossim", version, about)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Base RNG seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of resource classes
    #[arg(long)]
    pub classes: Option<usize>,

    /// Maximum concurrently running workers
    #[arg(long)]
    pub max_running: Option<usize>,

    /// Maximum workers launched over the whole run
    #[arg(long)]
    pub max_launched: Option<usize>,

    /// Emit events as JSON lines instead of human-readable logs
    #[arg(long)]
    pub json: bool,

    /// Enable debug-level logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Apply CLI flags over a loaded configuration (highest precedence)
    pub fn apply(&self, config: &mut ossim_config::Config) {
        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
        if let Some(classes) = self.classes {
            config.resources.classes = classes;
        }
        if let Some(max_running) = self.max_running {
            config.workers.max_running = max_running;
        }
        if let Some(max_launched) = self.max_launched {
            config.workers.max_launched = max_launched;
        }
    }
}
