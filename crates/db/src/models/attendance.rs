//! Employee attendance models.

use campus_core::types::DbId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One attendance row from the `employee_attendance` table, unique per
/// (employee, day).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AttendanceEntry {
    pub id: DbId,
    pub employee_id: DbId,
    pub day: NaiveDate,
    pub status: String,
    pub note: Option<String>,
}

/// Recognized attendance statuses.
pub const ATTENDANCE_STATUSES: &[&str] = &["present", "absent", "leave", "half_day", "holiday"];

/// Input for stamping (or re-stamping) one employee's day.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertAttendance {
    pub day: NaiveDate,
    pub status: String,
    pub note: Option<String>,
}
