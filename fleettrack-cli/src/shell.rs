//! Line-oriented operator shell.
//!
//! One state, "awaiting command": every iteration prints the menu, reads a
//! command and runs it. Only `quit` (or the end of input) leaves the loop.
//! Parse failures abort the current command and are reported; fleet
//! conditions such as an unknown vehicle are reported by the fleet itself.

use std::io::{BufRead, Write};
use std::sync::Arc;

use tracing::{error, info};

use fleettrack_core::{Fleet, Position};
use fleettrack_simulator::SimulationRegistry;

use crate::error::{InputError, ShellError};

pub const MENU: &str = "[COMMANDS] add - add vehicle, update - update position, \
simulate - simulate movement, position - show position, history - show track, \
list - list vehicles, stop - stop simulations, metrics - show counters, quit - exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add,
    Update,
    Simulate,
    Position,
    History,
    List,
    Stop,
    Metrics,
    Quit,
    Unknown(String),
}

impl Command {
    /// Commands are case-insensitive and ignore surrounding whitespace.
    pub fn parse(line: &str) -> Self {
        match line.trim().to_lowercase().as_str() {
            "add" => Command::Add,
            "update" => Command::Update,
            "simulate" => Command::Simulate,
            "position" => Command::Position,
            "history" => Command::History,
            "list" => Command::List,
            "stop" => Command::Stop,
            "metrics" => Command::Metrics,
            "quit" => Command::Quit,
            other => Command::Unknown(other.to_owned()),
        }
    }
}

pub struct Shell<R, W> {
    input: R,
    output: W,
    simulations: Arc<SimulationRegistry>,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W, simulations: Arc<SimulationRegistry>) -> Self {
        Self {
            input,
            output,
            simulations,
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn fleet(&self) -> &Arc<Fleet> {
        self.simulations.simulator().fleet()
    }

    /// Runs until `quit` or end of input. Simulations started here keep
    /// running after the loop returns.
    pub fn run(&mut self) -> Result<(), ShellError> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "{}", MENU)?;
            let line = match self.read_field("Enter command: ") {
                Ok(line) => line,
                Err(ShellError::EndOfInput) => return Ok(()),
                Err(e) => return Err(e),
            };

            match self.execute(Command::parse(&line)) {
                Ok(true) => continue,
                Ok(false) | Err(ShellError::EndOfInput) => return Ok(()),
                Err(e) => return Err(e),
            }
        }
    }

    /// Returns `Ok(false)` once the shell should stop.
    fn execute(&mut self, command: Command) -> Result<bool, ShellError> {
        match command {
            Command::Add => self.add()?,
            Command::Update => self.update()?,
            Command::Simulate => self.simulate()?,
            Command::Position => self.position()?,
            Command::History => self.history()?,
            Command::List => self.list()?,
            Command::Stop => {
                let id = self.read_field("Enter vehicle ID: ")?;
                self.simulations.stop_vehicle(&id);
            }
            Command::Metrics => match self.fleet().metrics().gather_metrics() {
                Ok(text) => write!(self.output, "{}", text)?,
                Err(e) => error!("Failed to gather metrics: {}", e),
            },
            Command::Quit => {
                writeln!(self.output, "Exiting Fleet Tracker.")?;
                return Ok(false);
            }
            Command::Unknown(_) => error!("Unknown command."),
        }
        Ok(true)
    }

    fn add(&mut self) -> Result<(), ShellError> {
        let id = self.read_field("Enter vehicle ID: ")?;
        let Some(position) =
            self.read_position("Enter starting latitude: ", "Enter starting longitude: ")?
        else {
            return Ok(());
        };
        // Duplicates are reported by the fleet.
        let _ = self.fleet().add_vehicle(id, position);
        Ok(())
    }

    fn update(&mut self) -> Result<(), ShellError> {
        let id = self.read_field("Enter vehicle ID: ")?;
        let Some(position) =
            self.read_position("Enter new latitude: ", "Enter new longitude: ")?
        else {
            return Ok(());
        };
        let _ = self
            .fleet()
            .update_vehicle_position(&id, position.latitude, position.longitude);
        Ok(())
    }

    fn simulate(&mut self) -> Result<(), ShellError> {
        let id = self.read_field("Enter vehicle ID: ")?;
        let raw = self.read_field("Enter simulation duration (seconds): ")?;
        // Negative durations run zero steps.
        match raw.parse::<i64>().map_err(InputError::Duration) {
            Ok(seconds) => {
                self.simulations.spawn(&id, u64::try_from(seconds).unwrap_or(0));
            }
            Err(e) => error!("{}", e),
        }
        Ok(())
    }

    fn position(&mut self) -> Result<(), ShellError> {
        let id = self.read_field("Enter vehicle ID: ")?;
        if let Ok(position) = self.fleet().vehicle_position(&id) {
            writeln!(self.output, "Vehicle {} is at {}", id, position)?;
        }
        Ok(())
    }

    fn history(&mut self) -> Result<(), ShellError> {
        let id = self.read_field("Enter vehicle ID: ")?;
        let Ok(points) = self.fleet().tracking_data(&id) else {
            return Ok(());
        };
        if points.is_empty() {
            writeln!(self.output, "Vehicle {} has no recorded positions.", id)?;
        }
        for point in points {
            writeln!(self.output, "  {}", point)?;
        }
        Ok(())
    }

    fn list(&mut self) -> Result<(), ShellError> {
        let fleet = Arc::clone(self.fleet());
        let ids = fleet.vehicle_ids();
        if ids.is_empty() {
            writeln!(self.output, "No vehicles in fleet.")?;
        }
        for id in ids {
            if let Ok(position) = fleet.vehicle_position(&id) {
                writeln!(self.output, "  {}: {}", id, position)?;
            }
        }
        info!("{} vehicle(s), {} simulation(s) running.", fleet.len(), self.simulations.active());
        Ok(())
    }

    /// Reads latitude then longitude. A parse failure is reported and yields
    /// `None` before the next prompt is shown.
    fn read_position(
        &mut self,
        latitude_prompt: &str,
        longitude_prompt: &str,
    ) -> Result<Option<Position>, ShellError> {
        let latitude = match self.read_coordinate(latitude_prompt)? {
            Ok(value) => value,
            Err(e) => {
                error!("{}", e);
                return Ok(None);
            }
        };
        let longitude = match self.read_coordinate(longitude_prompt)? {
            Ok(value) => value,
            Err(e) => {
                error!("{}", e);
                return Ok(None);
            }
        };
        Ok(Some(Position::new(latitude, longitude)))
    }

    fn read_coordinate(&mut self, prompt: &str) -> Result<Result<f64, InputError>, ShellError> {
        let raw = self.read_field(prompt)?;
        Ok(raw.parse::<f64>().map_err(InputError::Coordinate))
    }

    /// Prints `prompt` and returns the next input line, trimmed.
    fn read_field(&mut self, prompt: &str) -> Result<String, ShellError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ShellError::EndOfInput);
        }
        Ok(line.trim().to_owned())
    }
}
