//! Enrollment models and DTOs.

use campus_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::class_section::ClassSection;
use crate::models::classroom::Classroom;
use crate::models::exam_entry::ExamEntry;
use crate::models::monthly_fee::MonthlyFee;
use crate::models::student::Student;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// An enrollment row from the `enrollments` table.
///
/// `monthly_fee` and `subjects` are snapshots taken from the section at
/// creation time. `session_start`/`session_end` form a half-open
/// `[start, end)` interval normalized to month starts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Enrollment {
    pub id: DbId,
    pub student_id: DbId,
    pub classroom_id: DbId,
    pub section_id: DbId,
    pub session_start: NaiveDate,
    pub session_end: NaiveDate,
    pub monthly_fee: f64,
    pub one_time_fee: Option<f64>,
    pub subjects: serde_json::Value,
    pub is_active: bool,
    pub is_complete: bool,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for enrolling a student into a section.
///
/// When `monthly_fee` is absent the section's `default_fee` is snapshotted
/// instead.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEnrollment {
    pub section_id: DbId,
    pub session_start: NaiveDate,
    pub session_end: NaiveDate,
    pub monthly_fee: Option<f64>,
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Update DTO
// ---------------------------------------------------------------------------

/// Lifecycle patch for an enrollment.
///
/// Setting `is_complete` back to `false` on an archived enrollment is the
/// administrative escape hatch, not a normal lifecycle step.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEnrollment {
    pub is_active: Option<bool>,
    pub is_complete: Option<bool>,
    pub one_time_fee: Option<f64>,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// Full enrollment detail: the row plus everything hanging off it.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentDetails {
    pub enrollment: Enrollment,
    pub student: Student,
    pub classroom: Classroom,
    pub section: ClassSection,
    pub monthly_fees: Vec<MonthlyFee>,
    pub exam_entries: Vec<ExamEntry>,
}
