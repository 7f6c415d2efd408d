//! Repository for the `employee_attendance` table.

use campus_core::calendar::{first_of_month, next_month};
use campus_core::error::CoreError;
use campus_core::types::DbId;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::attendance::{AttendanceEntry, UpsertAttendance, ATTENDANCE_STATUSES};

const COLUMNS: &str = "id, employee_id, day, status, note";

/// Provides day-stamping and range queries for employee attendance.
pub struct AttendanceRepo;

impl AttendanceRepo {
    /// Stamp (or re-stamp) one employee's day.
    pub async fn upsert(
        pool: &PgPool,
        employee_id: DbId,
        input: &UpsertAttendance,
    ) -> RepoResult<AttendanceEntry> {
        if !ATTENDANCE_STATUSES.contains(&input.status.as_str()) {
            return Err(CoreError::Validation(format!(
                "Unknown attendance status '{}'",
                input.status
            ))
            .into());
        }

        let employee: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM employees WHERE id = $1")
                .bind(employee_id)
                .fetch_optional(pool)
                .await?;
        if employee.is_none() {
            return Err(CoreError::NotFound { entity: "Employee", id: employee_id }.into());
        }

        let query = format!(
            "INSERT INTO employee_attendance (employee_id, day, status, note)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (employee_id, day)
             DO UPDATE SET status = EXCLUDED.status, note = EXCLUDED.note
             RETURNING {COLUMNS}"
        );
        let entry = sqlx::query_as::<_, AttendanceEntry>(&query)
            .bind(employee_id)
            .bind(input.day)
            .bind(&input.status)
            .bind(&input.note)
            .fetch_one(pool)
            .await?;
        Ok(entry)
    }

    /// An employee's attendance for the month containing `month`.
    pub async fn month_for_employee(
        pool: &PgPool,
        employee_id: DbId,
        month: NaiveDate,
    ) -> Result<Vec<AttendanceEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM employee_attendance
             WHERE employee_id = $1 AND day >= $2 AND day < $3
             ORDER BY day"
        );
        sqlx::query_as::<_, AttendanceEntry>(&query)
            .bind(employee_id)
            .bind(first_of_month(month))
            .bind(next_month(month))
            .fetch_all(pool)
            .await
    }

    /// Every employee's entry for one day.
    pub async fn for_day(pool: &PgPool, day: NaiveDate) -> Result<Vec<AttendanceEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM employee_attendance
             WHERE day = $1
             ORDER BY employee_id"
        );
        sqlx::query_as::<_, AttendanceEntry>(&query)
            .bind(day)
            .fetch_all(pool)
            .await
    }

    /// Mark a day as a holiday for every active employee, overwriting any
    /// entries already stamped for that day. Returns the number of entries
    /// written.
    pub async fn mark_holiday(pool: &PgPool, day: NaiveDate) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO employee_attendance (employee_id, day, status)
             SELECT id, $1, 'holiday' FROM employees WHERE is_active = TRUE
             ON CONFLICT (employee_id, day)
             DO UPDATE SET status = 'holiday', note = NULL",
        )
        .bind(day)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
