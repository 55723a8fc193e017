//! Background simulation tasks.
//!
//! Every simulation started from the shell runs as its own tokio task. The
//! registry keeps the handles so running simulations can be counted, stopped
//! per vehicle, or shut down together; the caller never waits on them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{info, info_span, Instrument};

use fleettrack_telemetry::MetricsRecorder;

use crate::movement::RandomWalk;
use crate::MovementSimulator;

pub type SimulationId = u64;

struct SimulationTask {
    vehicle_id: String,
    handle: JoinHandle<()>,
}

// Keeps the active gauge right whether the task completes or is aborted.
struct ActiveGuard(MetricsRecorder);

impl ActiveGuard {
    fn new(metrics: MetricsRecorder) -> Self {
        metrics.simulations_active.inc();
        Self(metrics)
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.simulations_active.dec();
    }
}

pub struct SimulationRegistry {
    simulator: Arc<MovementSimulator>,
    runtime: Handle,
    tasks: Mutex<HashMap<SimulationId, SimulationTask>>,
    next_id: AtomicU64,
}

impl SimulationRegistry {
    /// Tasks are spawned on `runtime`, so `spawn` may be called from threads
    /// outside the runtime.
    pub fn new(simulator: Arc<MovementSimulator>, runtime: Handle) -> Self {
        Self {
            simulator,
            runtime,
            tasks: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn simulator(&self) -> &Arc<MovementSimulator> {
        &self.simulator
    }

    /// Starts a simulation in the background and returns without waiting.
    ///
    /// An unknown vehicle is reported from inside the task.
    pub fn spawn(&self, vehicle_id: &str, steps: u64) -> SimulationId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let simulator = Arc::clone(&self.simulator);
        let metrics = simulator.fleet().metrics().clone();
        let mut model = RandomWalk::from_config(simulator.config(), id);
        let vehicle = vehicle_id.to_owned();

        metrics.simulations_started.inc();
        info!(
            "Simulation {} started for vehicle {} ({} steps).",
            id, vehicle_id, steps
        );

        let span = info_span!("simulation", id, vehicle = %vehicle_id);
        let handle = self.runtime.spawn(
            async move {
                let _active = ActiveGuard::new(metrics);
                if simulator.drive(&vehicle, steps, &mut model).await.is_ok() {
                    info!("Simulation {} for vehicle {} completed.", id, vehicle);
                }
            }
            .instrument(span),
        );

        let mut tasks = self.tasks.lock();
        tasks.retain(|_, task| !task.handle.is_finished());
        tasks.insert(
            id,
            SimulationTask {
                vehicle_id: vehicle_id.to_owned(),
                handle,
            },
        );
        id
    }

    /// Number of simulations still running.
    pub fn active(&self) -> usize {
        let mut tasks = self.tasks.lock();
        tasks.retain(|_, task| !task.handle.is_finished());
        tasks.len()
    }

    /// Aborts every running simulation of `vehicle_id`; returns how many were stopped.
    pub fn stop_vehicle(&self, vehicle_id: &str) -> usize {
        let mut stopped = 0;
        self.tasks.lock().retain(|_, task| {
            if task.vehicle_id != vehicle_id {
                return !task.handle.is_finished();
            }
            if !task.handle.is_finished() {
                task.handle.abort();
                stopped += 1;
            }
            false
        });
        info!(
            "Stopped {} simulation(s) for vehicle {}.",
            stopped, vehicle_id
        );
        stopped
    }

    /// Aborts every running simulation; returns how many were stopped.
    pub fn shutdown(&self) -> usize {
        let mut stopped = 0;
        for (_, task) in self.tasks.lock().drain() {
            if !task.handle.is_finished() {
                task.handle.abort();
                stopped += 1;
            }
        }
        stopped
    }

    /// Waits for every simulation registered so far to finish.
    pub async fn join_all(&self) {
        let tasks: Vec<SimulationTask> = self.tasks.lock().drain().map(|(_, task)| task).collect();
        for task in tasks {
            // Aborted tasks resolve to a cancellation error.
            let _ = task.handle.await;
        }
    }
}

impl Drop for SimulationRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleettrack_config::SimulationConfig;
    use fleettrack_core::{Fleet, Position};
    use std::time::Duration;

    fn registry() -> SimulationRegistry {
        let fleet = Arc::new(Fleet::default());
        let simulator = Arc::new(MovementSimulator::new(fleet, SimulationConfig::default()));
        SimulationRegistry::new(simulator, Handle::current())
    }

    fn fleet(registry: &SimulationRegistry) -> &Arc<Fleet> {
        registry.simulator().fleet()
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_simulation_runs_to_completion() {
        let registry = registry();
        fleet(&registry)
            .add_vehicle("v1", Position::new(10.0, 20.0))
            .unwrap();

        let id = registry.spawn("v1", 3);
        assert_eq!(id, 1);
        assert_eq!(registry.active(), 1);

        registry.join_all().await;

        let history = fleet(&registry).tracking_data("v1").unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(
            fleet(&registry).vehicle_position("v1").unwrap(),
            history[2].position()
        );
        let metrics = fleet(&registry).metrics();
        assert_eq!(metrics.simulations_started.get(), 1);
        assert_eq!(metrics.simulations_active.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_vehicle_is_not_created() {
        let registry = registry();
        registry.spawn("ghost", 5);
        registry.join_all().await;
        assert!(!fleet(&registry).contains("ghost"));
        assert_eq!(registry.active(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_simulations_of_one_vehicle_interleave_whole_steps() {
        let registry = registry();
        fleet(&registry)
            .add_vehicle("v1", Position::default())
            .unwrap();

        registry.spawn("v1", 5);
        registry.spawn("v1", 5);
        registry.join_all().await;

        let history = fleet(&registry).tracking_data("v1").unwrap();
        assert_eq!(history.len(), 10);
        let mut previous = Position::default();
        for point in &history {
            assert!((point.latitude - previous.latitude).abs() <= 0.01);
            assert!((point.longitude - previous.longitude).abs() <= 0.01);
            previous = point.position();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stop_vehicle_aborts_only_that_vehicle() {
        let registry = registry();
        fleet(&registry)
            .add_vehicle("v1", Position::default())
            .unwrap();
        fleet(&registry)
            .add_vehicle("v2", Position::default())
            .unwrap();

        registry.spawn("v1", 100);
        registry.spawn("v2", 3);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(registry.stop_vehicle("v1"), 1);
        let stopped_at = fleet(&registry).tracking_data("v1").unwrap().len();
        assert_eq!(stopped_at, 2);

        registry.join_all().await;
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(fleet(&registry).tracking_data("v1").unwrap().len(), stopped_at);
        assert_eq!(fleet(&registry).tracking_data("v2").unwrap().len(), 3);
        assert_eq!(fleet(&registry).metrics().simulations_active.get(), 0);
        assert_eq!(registry.stop_vehicle("v1"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_aborts_everything() {
        let registry = registry();
        fleet(&registry)
            .add_vehicle("v1", Position::default())
            .unwrap();

        registry.spawn("v1", 100);
        registry.spawn("v1", 100);
        tokio::task::yield_now().await;

        assert_eq!(registry.shutdown(), 2);
        assert_eq!(registry.active(), 0);
    }
}
