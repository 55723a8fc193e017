//! ## fleettrack-telemetry::metrics
//! **Prometheus counters for the fleet**
//!
//! Clones share the same underlying collectors, so one recorder can be handed
//! to the fleet, the simulation registry and the shell.

use prometheus::{IntCounter, IntGauge, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub vehicles: IntGauge,
    pub position_updates: IntCounter,
    pub simulations_started: IntCounter,
    pub simulations_active: IntGauge,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();
        let vehicles = IntGauge::new("fleettrack_vehicles", "Vehicles registered in the fleet")
            .unwrap();
        let position_updates = IntCounter::new(
            "fleettrack_position_updates_total",
            "Accepted vehicle position updates",
        )
        .unwrap();
        let simulations_started = IntCounter::new(
            "fleettrack_simulations_started_total",
            "Movement simulations launched",
        )
        .unwrap();
        let simulations_active = IntGauge::new(
            "fleettrack_simulations_active",
            "Movement simulations currently running",
        )
        .unwrap();

        registry.register(Box::new(vehicles.clone())).unwrap();
        registry
            .register(Box::new(position_updates.clone()))
            .unwrap();
        registry
            .register(Box::new(simulations_started.clone()))
            .unwrap();
        registry
            .register(Box::new(simulations_active.clone()))
            .unwrap();

        Self {
            registry,
            vehicles,
            position_updates,
            simulations_started,
            simulations_active,
        }
    }

    /// Renders every collector in the Prometheus text format.
    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn inc_position_updates(&self) {
        self.position_updates.inc();
    }
}
