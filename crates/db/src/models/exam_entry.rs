//! Exam entry models and DTOs.

use campus_core::types::DbId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An exam entry row from the `exam_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExamEntry {
    pub id: DbId,
    pub enrollment_id: DbId,
    pub exam_name: String,
    pub exam_type: String,
    pub exam_date: NaiveDate,
    pub note: Option<String>,
}

/// Input for recording an exam under an enrollment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExamEntry {
    pub exam_name: String,
    pub exam_type: String,
    pub exam_date: NaiveDate,
    pub note: Option<String>,
}

/// Patch for an existing exam entry.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateExamEntry {
    pub exam_name: Option<String>,
    pub exam_type: Option<String>,
    pub exam_date: Option<NaiveDate>,
    pub note: Option<String>,
}
