//! ## fleettrack-cli
//! **Interactive operator prompt for the fleet tracker**
//!
//! Builds the fleet and the simulation registry, then hands stdin/stdout to
//! the command shell. The shell runs on the blocking pool so simulations keep
//! moving on the runtime while it waits for input.

use std::io;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::runtime::Handle;
use tracing::info;

use fleettrack_core::Fleet;
use fleettrack_simulator::{MovementSimulator, SimulationRegistry};
use fleettrack_telemetry::{EventLogger, MetricsRecorder};

mod commands;
mod error;
mod shell;

use commands::Cli;
use shell::Shell;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config().context("failed to load configuration")?;
    EventLogger::init(&config.telemetry);

    let fleet = Arc::new(Fleet::new(MetricsRecorder::new()));
    let simulator = Arc::new(MovementSimulator::new(fleet, config.simulation));
    let simulations = Arc::new(SimulationRegistry::new(simulator, Handle::current()));

    let registry = Arc::clone(&simulations);
    tokio::task::spawn_blocking(move || {
        let stdin = io::stdin();
        let mut shell = Shell::new(stdin.lock(), io::stdout(), registry);
        shell.run()
    })
    .await
    .context("command shell terminated abnormally")?
    .context("command shell failed")?;

    let stopped = simulations.shutdown();
    if stopped > 0 {
        info!("Stopped {} running simulation(s).", stopped);
    }
    Ok(())
}
