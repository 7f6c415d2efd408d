//! Repository for the `drivers` table.

use campus_core::error::CoreError;
use campus_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::vehicle::{CreateDriver, Driver};

const COLUMNS: &str = "id, employee_id, license_number";

/// Provides operations for driver records (one per driving employee).
pub struct DriverRepo;

impl DriverRepo {
    /// Register an employee as a driver.
    ///
    /// Fails with `NotFound` when the employee does not exist; a second
    /// registration for the same employee violates the unique constraint.
    pub async fn create(
        pool: &PgPool,
        employee_id: DbId,
        input: &CreateDriver,
    ) -> RepoResult<Driver> {
        let employee: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM employees WHERE id = $1")
                .bind(employee_id)
                .fetch_optional(pool)
                .await?;
        if employee.is_none() {
            return Err(CoreError::NotFound { entity: "Employee", id: employee_id }.into());
        }

        let query = format!(
            "INSERT INTO drivers (employee_id, license_number)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let driver = sqlx::query_as::<_, Driver>(&query)
            .bind(employee_id)
            .bind(&input.license_number)
            .fetch_one(pool)
            .await?;
        Ok(driver)
    }

    /// Find a driver by their primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Driver>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drivers WHERE id = $1");
        sqlx::query_as::<_, Driver>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the driver record for an employee, if any.
    pub async fn find_by_employee(
        pool: &PgPool,
        employee_id: DbId,
    ) -> Result<Option<Driver>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drivers WHERE employee_id = $1");
        sqlx::query_as::<_, Driver>(&query)
            .bind(employee_id)
            .fetch_optional(pool)
            .await
    }
}
