// fleettrack-simulator/src/lib.rs

/*!
# Fleet Tracker Simulator

Time-driven movement simulation for vehicles in a [`Fleet`].

## Key Components:
- **Movement models:** how the next position is derived from the current one.
- **Movement simulator:** applies a model to one vehicle, one step per interval.
- **Simulation registry:** owns the background tasks so they can be stopped.
*/

use std::sync::Arc;

use tracing::debug;

use fleettrack_config::SimulationConfig;
use fleettrack_core::{Fleet, FleetError};

pub mod movement;
pub mod registry;

pub use movement::{MovementModel, RandomWalk};
pub use registry::{SimulationId, SimulationRegistry};

/// Drives vehicles of a shared fleet through simulated movement.
///
/// # Fields
/// - `fleet`: the registry whose vehicles are moved.
/// - `config`: step interval, offset bound and optional seed.
#[derive(Debug)]
pub struct MovementSimulator {
    fleet: Arc<Fleet>,
    config: SimulationConfig,
}

impl MovementSimulator {
    pub fn new(fleet: Arc<Fleet>, config: SimulationConfig) -> Self {
        Self { fleet, config }
    }

    pub fn fleet(&self) -> &Arc<Fleet> {
        &self.fleet
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Moves `vehicle_id` by a bounded random offset `steps` times, pausing
    /// one step interval after each move. Returns the number of steps applied.
    ///
    /// An unknown vehicle is reported immediately and nothing is created.
    pub async fn simulate_movement(&self, vehicle_id: &str, steps: u64) -> Result<u64, FleetError> {
        let mut model = RandomWalk::from_config(&self.config, 0);
        self.drive(vehicle_id, steps, &mut model).await
    }

    /// Same as [`simulate_movement`](Self::simulate_movement) with an explicit model.
    pub async fn drive<M>(&self, vehicle_id: &str, steps: u64, model: &mut M) -> Result<u64, FleetError>
    where
        M: MovementModel + ?Sized,
    {
        self.fleet.vehicle(vehicle_id)?;

        let interval = self.config.step_interval();
        for step in 0..steps {
            self.fleet
                .move_vehicle(vehicle_id, |current| model.next_position(current))?;
            debug!("Vehicle {} simulation step {}/{}", vehicle_id, step + 1, steps);
            tokio::time::sleep(interval).await;
        }
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::Stationary;
    use fleettrack_core::Position;
    use std::time::Duration;
    use tracing_test::traced_test;

    fn simulator(seed: Option<u64>) -> MovementSimulator {
        let fleet = Arc::new(Fleet::default());
        let config = SimulationConfig {
            seed,
            ..Default::default()
        };
        MovementSimulator::new(fleet, config)
    }

    #[tokio::test(start_paused = true)]
    #[traced_test]
    async fn unknown_vehicle_returns_immediately() {
        let simulator = simulator(None);
        let start = tokio::time::Instant::now();

        let err = simulator.simulate_movement("ghost", 10).await.unwrap_err();

        assert_eq!(err, FleetError::VehicleNotFound("ghost".into()));
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(simulator.fleet().is_empty());
        assert!(logs_contain("Vehicle ghost not found."));
    }

    #[tokio::test(start_paused = true)]
    async fn appends_one_bounded_entry_per_step() {
        let simulator = simulator(None);
        simulator
            .fleet()
            .add_vehicle("v1", Position::new(10.0, 20.0))
            .unwrap();

        let steps = simulator.simulate_movement("v1", 3).await.unwrap();
        assert_eq!(steps, 3);

        let history = simulator.fleet().tracking_data("v1").unwrap();
        assert_eq!(history.len(), 3);
        let mut previous = Position::new(10.0, 20.0);
        for point in &history {
            assert!((point.latitude - previous.latitude).abs() <= 0.01);
            assert!((point.longitude - previous.longitude).abs() <= 0.01);
            previous = point.position();
        }
        assert_eq!(
            simulator.fleet().vehicle_position("v1").unwrap(),
            history[2].position()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn pauses_one_interval_per_step() {
        let simulator = simulator(None);
        simulator
            .fleet()
            .add_vehicle("v1", Position::default())
            .unwrap();
        let start = tokio::time::Instant::now();

        simulator.drive("v1", 4, &mut Stationary).await.unwrap();

        assert_eq!(start.elapsed(), Duration::from_secs(4));
        assert_eq!(simulator.fleet().tracking_data("v1").unwrap().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_steps_changes_nothing() {
        let simulator = simulator(None);
        simulator
            .fleet()
            .add_vehicle("v1", Position::default())
            .unwrap();
        assert_eq!(simulator.simulate_movement("v1", 0).await.unwrap(), 0);
        assert!(simulator.fleet().tracking_data("v1").unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn seeded_runs_are_reproducible() {
        let a = simulator(Some(99));
        let b = simulator(Some(99));
        for simulator in [&a, &b] {
            simulator
                .fleet()
                .add_vehicle("v1", Position::default())
                .unwrap();
            simulator.simulate_movement("v1", 5).await.unwrap();
        }
        assert_eq!(
            a.fleet().vehicle_position("v1").unwrap(),
            b.fleet().vehicle_position("v1").unwrap()
        );
    }
}
