//! Classroom section models and DTOs.

use campus_core::types::DbId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A section row from the `class_sections` table.
///
/// `subjects` is a JSON array of `{ name, teacher }` objects; enrollments
/// snapshot it at creation time so later curriculum edits do not rewrite
/// history.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClassSection {
    pub id: DbId,
    pub classroom_id: DbId,
    pub name: String,
    pub is_active: bool,
    pub default_fee: f64,
    pub subjects: serde_json::Value,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Input for creating a section under a classroom.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClassSection {
    pub name: String,
    pub default_fee: f64,
    pub subjects: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}

/// Patch for an existing section.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateClassSection {
    pub name: Option<String>,
    pub default_fee: Option<f64>,
    pub subjects: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}

/// One row of a section roster: the student plus their enrollment window.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SectionRosterEntry {
    pub student_id: DbId,
    pub student_name: String,
    pub enrollment_id: DbId,
    pub session_start: NaiveDate,
    pub session_end: NaiveDate,
    pub is_active: bool,
    pub is_complete: bool,
}
