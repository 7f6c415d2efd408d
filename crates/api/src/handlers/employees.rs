//! Handlers for employees, drivers, and daily attendance.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_db::models::attendance::UpsertAttendance;
use campus_db::models::employee::{CreateEmployee, UpdateEmployee};
use campus_db::models::vehicle::CreateDriver;
use campus_db::repositories::{AttendanceRepo, DriverRepo, EmployeeRepo};

use crate::error::{AppError, AppResult};
use crate::query::{validated, PageParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameters and payloads
// ---------------------------------------------------------------------------

/// Month selector (`?month=2024-05-01`); any day within the month works.
#[derive(Debug, Deserialize)]
pub struct MonthParams {
    pub month: NaiveDate,
}

/// Day selector for the daily attendance sheet.
#[derive(Debug, Deserialize)]
pub struct DayParams {
    pub date: NaiveDate,
}

/// Body for marking a day as a holiday for all active employees.
#[derive(Debug, Deserialize)]
pub struct HolidayBody {
    pub day: NaiveDate,
}

// ---------------------------------------------------------------------------
// POST /employees
// ---------------------------------------------------------------------------

/// Hire a new employee.
pub async fn create_employee(
    State(state): State<AppState>,
    Json(body): Json<CreateEmployee>,
) -> AppResult<impl IntoResponse> {
    let employee = EmployeeRepo::create(&state.pool, &body).await?;

    tracing::info!(employee_id = employee.id, "Employee created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: employee })))
}

// ---------------------------------------------------------------------------
// GET /employees
// ---------------------------------------------------------------------------

/// Page through employees, by name.
pub async fn list_employees(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let params = validated(params)?;

    let employees = EmployeeRepo::list(&state.pool, params.limit, params.offset()).await?;

    Ok(Json(DataResponse { data: employees }))
}

// ---------------------------------------------------------------------------
// GET /employees/{id}
// ---------------------------------------------------------------------------

/// Get one employee.
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let employee = EmployeeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Employee", id }))?;

    Ok(Json(DataResponse { data: employee }))
}

// ---------------------------------------------------------------------------
// PATCH /employees/{id}
// ---------------------------------------------------------------------------

/// Patch an employee.
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateEmployee>,
) -> AppResult<impl IntoResponse> {
    let employee = EmployeeRepo::update(&state.pool, id, &body)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Employee", id }))?;

    Ok(Json(DataResponse { data: employee }))
}

// ---------------------------------------------------------------------------
// DELETE /employees/{id}
// ---------------------------------------------------------------------------

/// Delete an employee.
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = EmployeeRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Employee", id }));
    }

    Ok(Json(DataResponse { data: true }))
}

// ---------------------------------------------------------------------------
// POST /employees/{id}/driver
// ---------------------------------------------------------------------------

/// Register an employee as a driver.
pub async fn register_driver(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<CreateDriver>,
) -> AppResult<impl IntoResponse> {
    let driver = DriverRepo::create(&state.pool, id, &body).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: driver })))
}

// ---------------------------------------------------------------------------
// PUT /employees/{id}/attendance
// ---------------------------------------------------------------------------

/// Stamp (or re-stamp) one employee's day.
pub async fn upsert_attendance(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpsertAttendance>,
) -> AppResult<impl IntoResponse> {
    let entry = AttendanceRepo::upsert(&state.pool, id, &body).await?;

    Ok(Json(DataResponse { data: entry }))
}

// ---------------------------------------------------------------------------
// GET /employees/{id}/attendance
// ---------------------------------------------------------------------------

/// An employee's attendance for one month.
pub async fn get_employee_attendance(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<MonthParams>,
) -> AppResult<impl IntoResponse> {
    let employee = EmployeeRepo::find_by_id(&state.pool, id).await?;
    if employee.is_none() {
        return Err(AppError::Core(CoreError::NotFound { entity: "Employee", id }));
    }

    let entries = AttendanceRepo::month_for_employee(&state.pool, id, params.month).await?;

    Ok(Json(DataResponse { data: entries }))
}

// ---------------------------------------------------------------------------
// GET /attendance/day
// ---------------------------------------------------------------------------

/// Every employee's entry for one day.
pub async fn get_daily_attendance(
    State(state): State<AppState>,
    Query(params): Query<DayParams>,
) -> AppResult<impl IntoResponse> {
    let entries = AttendanceRepo::for_day(&state.pool, params.date).await?;

    Ok(Json(DataResponse { data: entries }))
}

// ---------------------------------------------------------------------------
// POST /attendance/holiday
// ---------------------------------------------------------------------------

/// Mark a day as a holiday for every active employee.
pub async fn mark_holiday(
    State(state): State<AppState>,
    Json(body): Json<HolidayBody>,
) -> AppResult<impl IntoResponse> {
    let stamped = AttendanceRepo::mark_holiday(&state.pool, body.day).await?;

    tracing::info!(day = %body.day, stamped, "Day marked as holiday");
    Ok(Json(DataResponse { data: stamped }))
}
