//! Handlers for the student directory.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_db::models::enrollment::Enrollment;
use campus_db::models::fee_payment::PaymentPage;
use campus_db::models::student::{CreateStudent, Student, UpdateStudent};
use campus_db::repositories::{EnrollmentRepo, FeePaymentRepo, StudentRepo};

use crate::error::{AppError, AppResult};
use crate::query::{validated, ForceParams, PageParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameters and payloads
// ---------------------------------------------------------------------------

/// Query parameters for the directory search.
#[derive(Debug, Deserialize, Validate)]
pub struct SearchParams {
    pub q: String,
    #[validate(range(min = 1))]
    pub page: i64,
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,
    #[serde(default)]
    pub ascending: bool,
}

/// A student together with their enrollments.
#[derive(Debug, Serialize)]
pub struct StudentProfile {
    pub student: Student,
    pub enrollments: Vec<Enrollment>,
}

/// One page of directory search results.
#[derive(Debug, Serialize)]
pub struct SearchPage {
    pub students: Vec<Student>,
    pub total: i64,
}

// ---------------------------------------------------------------------------
// POST /students
// ---------------------------------------------------------------------------

/// Register a new student.
pub async fn create_student(
    State(state): State<AppState>,
    Json(body): Json<CreateStudent>,
) -> AppResult<impl IntoResponse> {
    let student = StudentRepo::create(&state.pool, &body).await?;

    tracing::info!(student_id = student.id, "Student registered");
    Ok((StatusCode::CREATED, Json(DataResponse { data: student })))
}

// ---------------------------------------------------------------------------
// GET /students/{id}
// ---------------------------------------------------------------------------

/// Get a student with their enrollments.
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let student = StudentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Student", id }))?;

    let enrollments = EnrollmentRepo::list_for_student(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: StudentProfile { student, enrollments },
    }))
}

// ---------------------------------------------------------------------------
// PATCH /students/{id}
// ---------------------------------------------------------------------------

/// Patch a student's directory record.
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateStudent>,
) -> AppResult<impl IntoResponse> {
    let student = StudentRepo::update(&state.pool, id, &body)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Student", id }))?;

    Ok(Json(DataResponse { data: student }))
}

// ---------------------------------------------------------------------------
// DELETE /students/{id}
// ---------------------------------------------------------------------------

/// Delete a student.
///
/// Refused while the student has enrollments unless `?force=true`.
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<ForceParams>,
) -> AppResult<impl IntoResponse> {
    StudentRepo::delete(&state.pool, id, params.force).await?;

    Ok(Json(DataResponse { data: true }))
}

// ---------------------------------------------------------------------------
// GET /students/search
// ---------------------------------------------------------------------------

/// Case-insensitive directory search with pagination.
pub async fn search_students(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let params = validated(params)?;

    let (students, total) = StudentRepo::search(
        &state.pool,
        &params.q,
        params.limit,
        (params.page - 1) * params.limit,
        params.ascending,
    )
    .await?;

    Ok(Json(DataResponse {
        data: SearchPage { students, total },
    }))
}

// ---------------------------------------------------------------------------
// GET /students/{id}/payments
// ---------------------------------------------------------------------------

/// Page through a student's payment receipts, newest first.
pub async fn get_student_payments(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<PaymentPage>>> {
    let params = validated(params)?;

    let page =
        FeePaymentRepo::list_for_student(&state.pool, id, params.limit, params.offset()).await?;

    Ok(Json(DataResponse { data: page }))
}
