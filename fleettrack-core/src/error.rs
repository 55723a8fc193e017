use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FleetError {
    #[error("Vehicle {0} not found.")]
    VehicleNotFound(String),

    #[error("Vehicle {0} already exists in fleet.")]
    DuplicateVehicle(String),
}
