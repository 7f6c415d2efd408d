//! Handlers for enrollment lifecycle and exam entries.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use campus_core::types::DbId;
use campus_db::models::enrollment::{CreateEnrollment, UpdateEnrollment};
use campus_db::models::exam_entry::{CreateExamEntry, UpdateExamEntry};
use campus_db::repositories::{EnrollmentRepo, ExamEntryRepo};

use crate::error::AppResult;
use crate::query::ForceParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /students/{student_id}/enrollments
// ---------------------------------------------------------------------------

/// Enroll a student into a section.
///
/// Rejected when the proposed session overlaps an existing enrollment of
/// the same (student, section) by two or more months, or when the section
/// or its classroom is inactive.
pub async fn create_enrollment(
    State(state): State<AppState>,
    Path(student_id): Path<DbId>,
    Json(body): Json<CreateEnrollment>,
) -> AppResult<impl IntoResponse> {
    let enrollment = EnrollmentRepo::create(&state.pool, student_id, &body).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: enrollment })))
}

// ---------------------------------------------------------------------------
// GET /students/{student_id}/enrollments/{enrollment_id}
// ---------------------------------------------------------------------------

/// Full enrollment detail: placement, fee ledger, and exam entries.
pub async fn get_enrollment_details(
    State(state): State<AppState>,
    Path((student_id, enrollment_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let details = EnrollmentRepo::details(&state.pool, student_id, enrollment_id).await?;

    Ok(Json(DataResponse { data: details }))
}

// ---------------------------------------------------------------------------
// PATCH /students/{student_id}/enrollments/{enrollment_id}
// ---------------------------------------------------------------------------

/// Apply a lifecycle patch (`is_active`, `is_complete`, `one_time_fee`).
pub async fn update_enrollment(
    State(state): State<AppState>,
    Path((student_id, enrollment_id)): Path<(DbId, DbId)>,
    Json(body): Json<UpdateEnrollment>,
) -> AppResult<impl IntoResponse> {
    let enrollment =
        EnrollmentRepo::update(&state.pool, student_id, enrollment_id, &body).await?;

    Ok(Json(DataResponse { data: enrollment }))
}

// ---------------------------------------------------------------------------
// DELETE /students/{student_id}/enrollments/{enrollment_id}
// ---------------------------------------------------------------------------

/// Delete an enrollment. Refused while payment receipts exist unless
/// `?force=true`.
pub async fn delete_enrollment(
    State(state): State<AppState>,
    Path((student_id, enrollment_id)): Path<(DbId, DbId)>,
    Query(params): Query<ForceParams>,
) -> AppResult<impl IntoResponse> {
    EnrollmentRepo::delete(&state.pool, student_id, enrollment_id, params.force).await?;

    Ok(Json(DataResponse { data: true }))
}

// ---------------------------------------------------------------------------
// POST /students/{student_id}/enrollments/{enrollment_id}/exams
// ---------------------------------------------------------------------------

/// Record an exam under an active enrollment.
pub async fn create_exam_entry(
    State(state): State<AppState>,
    Path((_student_id, enrollment_id)): Path<(DbId, DbId)>,
    Json(body): Json<CreateExamEntry>,
) -> AppResult<impl IntoResponse> {
    let entry = ExamEntryRepo::create(&state.pool, enrollment_id, &body).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

// ---------------------------------------------------------------------------
// PATCH /students/{student_id}/enrollments/{enrollment_id}/exams/{entry_id}
// ---------------------------------------------------------------------------

/// Patch an exam entry.
pub async fn update_exam_entry(
    State(state): State<AppState>,
    Path((_student_id, enrollment_id, entry_id)): Path<(DbId, DbId, DbId)>,
    Json(body): Json<UpdateExamEntry>,
) -> AppResult<impl IntoResponse> {
    let entry = ExamEntryRepo::update(&state.pool, enrollment_id, entry_id, &body).await?;

    Ok(Json(DataResponse { data: entry }))
}

// ---------------------------------------------------------------------------
// DELETE /students/{student_id}/enrollments/{enrollment_id}/exams/{entry_id}
// ---------------------------------------------------------------------------

/// Delete an exam entry.
pub async fn delete_exam_entry(
    State(state): State<AppState>,
    Path((_student_id, enrollment_id, entry_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    ExamEntryRepo::delete(&state.pool, enrollment_id, entry_id).await?;

    Ok(Json(DataResponse { data: true }))
}
