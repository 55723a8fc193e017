use clap::Parser;
use std::path::PathBuf;

use fleettrack_config::{ConfigError, FleetConfig};

#[derive(Parser, Debug)]
#[command(name = "fleettrack", version, about = "Interactive in-memory fleet tracker")]
pub struct Cli {
    /// Configuration file; `config/fleettrack.yaml` is used when present and none is given.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed for reproducible simulated movement.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log filter directives, e.g. `info` or `fleettrack_simulator=debug`.
    #[arg(long)]
    pub log_filter: Option<String>,
}

impl Cli {
    /// Loads the configuration and applies command line overrides on top.
    pub fn load_config(&self) -> Result<FleetConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => FleetConfig::load_from_path(path)?,
            None => FleetConfig::load()?,
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut FleetConfig) {
        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
        if let Some(filter) = &self.log_filter {
            config.telemetry.log_filter = filter.clone();
        }
    }
}
