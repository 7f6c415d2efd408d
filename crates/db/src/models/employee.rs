//! Employee models and DTOs.

use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An employee row from the `employees` table.
///
/// `role` is free-form ("teacher", "driver", "clerk", ...); drivers get an
/// additional row in `drivers` carrying their license.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Employee {
    pub id: DbId,
    pub name: String,
    pub role: String,
    pub phone: Option<String>,
    pub monthly_salary: f64,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// Input for hiring a new employee.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEmployee {
    pub name: String,
    pub role: String,
    pub phone: Option<String>,
    pub monthly_salary: f64,
}

/// Patch for an existing employee.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub monthly_salary: Option<f64>,
    pub is_active: Option<bool>,
}
