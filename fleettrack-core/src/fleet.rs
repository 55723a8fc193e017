//! ## fleettrack-core::fleet
//! **Registry of tracked vehicles**
//!
//! The map is guarded by an `RwLock` and every vehicle by its own `Mutex`,
//! so simulation tasks moving different vehicles never contend and
//! concurrent writers to one vehicle interleave whole updates only.
//!
//! Not-found and duplicate conditions are logged here and returned as
//! [`FleetError`]; neither is fatal.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{error, info, warn};

use fleettrack_telemetry::MetricsRecorder;

use crate::error::FleetError;
use crate::vehicle::{Position, TrackPoint, Vehicle};

pub type SharedVehicle = Arc<Mutex<Vehicle>>;

#[derive(Debug, Default)]
pub struct Fleet {
    vehicles: RwLock<HashMap<String, SharedVehicle>>,
    metrics: MetricsRecorder,
}

impl Fleet {
    pub fn new(metrics: MetricsRecorder) -> Self {
        Self {
            vehicles: RwLock::new(HashMap::new()),
            metrics,
        }
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    /// Registers a new vehicle. An existing id is left untouched and
    /// reported as [`FleetError::DuplicateVehicle`].
    pub fn add_vehicle(&self, id: impl Into<String>, position: Position) -> Result<(), FleetError> {
        let id = id.into();
        match self.vehicles.write().entry(id) {
            Entry::Occupied(entry) => {
                warn!("Vehicle {} already exists in fleet.", entry.key());
                Err(FleetError::DuplicateVehicle(entry.key().clone()))
            }
            Entry::Vacant(entry) => {
                info!("Vehicle {} added to fleet.", entry.key());
                let vehicle = Vehicle::new(entry.key().clone(), position);
                entry.insert(Arc::new(Mutex::new(vehicle)));
                self.metrics.vehicles.inc();
                Ok(())
            }
        }
    }

    /// Sets the position of an existing vehicle.
    pub fn update_vehicle_position(
        &self,
        id: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<TrackPoint, FleetError> {
        self.move_vehicle(id, |_| Position::new(latitude, longitude))
    }

    /// Computes the next position from the current one and applies it while
    /// holding the vehicle's lock, so the read and the write cannot be split
    /// by another writer.
    pub fn move_vehicle<F>(&self, id: &str, next: F) -> Result<TrackPoint, FleetError>
    where
        F: FnOnce(Position) -> Position,
    {
        let record = self.vehicle(id)?;
        let mut vehicle = record.lock();
        let target = next(vehicle.position());
        let point = vehicle.update_position(target.latitude, target.longitude);
        self.metrics.inc_position_updates();
        Ok(point)
    }

    pub fn vehicle_position(&self, id: &str) -> Result<Position, FleetError> {
        Ok(self.vehicle(id)?.lock().position())
    }

    /// Snapshot of a vehicle's history.
    pub fn tracking_data(&self, id: &str) -> Result<Vec<TrackPoint>, FleetError> {
        Ok(self.vehicle(id)?.lock().tracking_data().to_vec())
    }

    /// Shared handle to a vehicle record.
    pub fn vehicle(&self, id: &str) -> Result<SharedVehicle, FleetError> {
        match self.vehicles.read().get(id) {
            Some(vehicle) => Ok(Arc::clone(vehicle)),
            None => {
                error!("Vehicle {} not found.", id);
                Err(FleetError::VehicleNotFound(id.to_owned()))
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.vehicles.read().contains_key(id)
    }

    /// Identifiers in ascending order.
    pub fn vehicle_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.vehicles.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.vehicles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.read().is_empty()
    }
}
