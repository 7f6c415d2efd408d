//! Repository for the `vehicles` table.

use campus_core::error::CoreError;
use campus_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::vehicle::{
    CreateVehicle, UpdateVehicle, UpdateVehicleLocation, Vehicle, VehicleWithDriver,
};

const COLUMNS: &str = "id, vehicle_number, driver_id, latest_lat, latest_long";

/// Provides fleet operations: CRUD, driver assignment, and GPS updates.
pub struct VehicleRepo;

impl VehicleRepo {
    /// Register a vehicle, optionally assigning a driver.
    ///
    /// A driver already assigned to another vehicle is rejected.
    pub async fn create(pool: &PgPool, input: &CreateVehicle) -> RepoResult<Vehicle> {
        let mut tx = pool.begin().await?;

        if let Some(driver_id) = input.driver_id {
            Self::ensure_driver_free(&mut tx, driver_id, None).await?;
        }

        let query = format!(
            "INSERT INTO vehicles (vehicle_number, driver_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let vehicle = sqlx::query_as::<_, Vehicle>(&query)
            .bind(&input.vehicle_number)
            .bind(input.driver_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(vehicle)
    }

    /// Find a vehicle by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vehicles WHERE id = $1");
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the fleet with each vehicle's driver name, if assigned.
    pub async fn list_with_drivers(pool: &PgPool) -> Result<Vec<VehicleWithDriver>, sqlx::Error> {
        sqlx::query_as::<_, VehicleWithDriver>(
            "SELECT v.id, v.vehicle_number, v.driver_id, e.name AS driver_name,
                    v.latest_lat, v.latest_long
             FROM vehicles v
             LEFT JOIN drivers d ON d.id = v.driver_id
             LEFT JOIN employees e ON e.id = d.employee_id
             ORDER BY v.vehicle_number",
        )
        .fetch_all(pool)
        .await
    }

    /// Patch a vehicle's number and/or driver assignment.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVehicle,
    ) -> RepoResult<Vehicle> {
        let mut tx = pool.begin().await?;

        let existing: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM vehicles WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if existing.is_none() {
            return Err(CoreError::NotFound { entity: "Vehicle", id }.into());
        }

        if let Some(driver_id) = input.driver_id {
            Self::ensure_driver_free(&mut tx, driver_id, Some(id)).await?;
        }

        let query = format!(
            "UPDATE vehicles SET
                vehicle_number = COALESCE($1, vehicle_number),
                driver_id = COALESCE($2, driver_id)
             WHERE id = $3
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Vehicle>(&query)
            .bind(&input.vehicle_number)
            .bind(input.driver_id)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Record a GPS ping for a vehicle.
    pub async fn update_location(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVehicleLocation,
    ) -> RepoResult<Vehicle> {
        let query = format!(
            "UPDATE vehicles SET latest_lat = $1, latest_long = $2
             WHERE id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(input.latest_lat)
            .bind(input.latest_long)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "Vehicle", id }.into())
    }

    /// Remove the driver assignment from a vehicle.
    pub async fn delink_driver(pool: &PgPool, id: DbId) -> RepoResult<Vehicle> {
        let query = format!(
            "UPDATE vehicles SET driver_id = NULL
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "Vehicle", id }.into())
    }

    /// Delete a vehicle by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Verify the driver exists and is not already assigned to a different
    /// vehicle.
    async fn ensure_driver_free(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        driver_id: DbId,
        vehicle_id: Option<DbId>,
    ) -> RepoResult<()> {
        let driver: Option<(DbId,)> = sqlx::query_as("SELECT id FROM drivers WHERE id = $1")
            .bind(driver_id)
            .fetch_optional(&mut **tx)
            .await?;
        if driver.is_none() {
            return Err(CoreError::NotFound { entity: "Driver", id: driver_id }.into());
        }

        let assigned: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM vehicles WHERE driver_id = $1 AND id IS DISTINCT FROM $2",
        )
        .bind(driver_id)
        .bind(vehicle_id)
        .fetch_optional(&mut **tx)
        .await?;
        if assigned.is_some() {
            return Err(CoreError::StateConflict(
                "Driver already has a vehicle assigned".into(),
            )
            .into());
        }
        Ok(())
    }
}
