//! Vehicle and driver models.

use campus_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A vehicle row from the `vehicles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Vehicle {
    pub id: DbId,
    pub vehicle_number: String,
    pub driver_id: Option<DbId>,
    pub latest_lat: Option<f64>,
    pub latest_long: Option<f64>,
}

/// A driver row from the `drivers` table; one per driving employee.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Driver {
    pub id: DbId,
    pub employee_id: DbId,
    pub license_number: String,
}

/// A vehicle joined with its assigned driver's name, for fleet listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VehicleWithDriver {
    pub id: DbId,
    pub vehicle_number: String,
    pub driver_id: Option<DbId>,
    pub driver_name: Option<String>,
    pub latest_lat: Option<f64>,
    pub latest_long: Option<f64>,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Input for registering a vehicle, optionally pre-assigned to a driver.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVehicle {
    pub vehicle_number: String,
    pub driver_id: Option<DbId>,
}

/// Patch for an existing vehicle.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateVehicle {
    pub vehicle_number: Option<String>,
    pub driver_id: Option<DbId>,
}

/// GPS ping from a vehicle tracker.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateVehicleLocation {
    pub latest_lat: f64,
    pub latest_long: f64,
}

/// Input for registering an employee as a driver.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDriver {
    pub license_number: String,
}
