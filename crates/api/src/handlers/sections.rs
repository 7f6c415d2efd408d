//! Handlers for classroom sections.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_db::models::class_section::{CreateClassSection, UpdateClassSection};
use campus_db::repositories::ClassSectionRepo;

use crate::error::{AppError, AppResult};
use crate::query::ForceParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /classrooms/{classroom_id}/sections
// ---------------------------------------------------------------------------

/// Create a section under a classroom.
pub async fn create_section(
    State(state): State<AppState>,
    Path(classroom_id): Path<DbId>,
    Json(body): Json<CreateClassSection>,
) -> AppResult<impl IntoResponse> {
    let section = ClassSectionRepo::create(&state.pool, classroom_id, &body).await?;

    tracing::info!(section_id = section.id, classroom_id, "Section created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: section })))
}

// ---------------------------------------------------------------------------
// GET /classrooms/{classroom_id}/sections
// ---------------------------------------------------------------------------

/// List a classroom's sections.
pub async fn list_sections(
    State(state): State<AppState>,
    Path(classroom_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let sections = ClassSectionRepo::list_by_classroom(&state.pool, classroom_id).await?;

    Ok(Json(DataResponse { data: sections }))
}

// ---------------------------------------------------------------------------
// PATCH /classrooms/{classroom_id}/sections/{section_id}
// ---------------------------------------------------------------------------

/// Patch a section belonging to the given classroom.
pub async fn update_section(
    State(state): State<AppState>,
    Path((classroom_id, section_id)): Path<(DbId, DbId)>,
    Json(body): Json<UpdateClassSection>,
) -> AppResult<impl IntoResponse> {
    let section = ClassSectionRepo::find_by_id(&state.pool, section_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ClassSection",
            id: section_id,
        }))?;
    if section.classroom_id != classroom_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Section does not belong to the specified classroom".into(),
        )));
    }

    let updated = ClassSectionRepo::update(&state.pool, section_id, &body)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ClassSection",
            id: section_id,
        }))?;

    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /classrooms/{classroom_id}/sections/{section_id}
// ---------------------------------------------------------------------------

/// Delete a section. Refused while enrollments exist unless `?force=true`.
pub async fn delete_section(
    State(state): State<AppState>,
    Path((classroom_id, section_id)): Path<(DbId, DbId)>,
    Query(params): Query<ForceParams>,
) -> AppResult<impl IntoResponse> {
    ClassSectionRepo::delete(&state.pool, classroom_id, section_id, params.force).await?;

    Ok(Json(DataResponse { data: true }))
}

// ---------------------------------------------------------------------------
// GET /classrooms/{classroom_id}/sections/{section_id}/roster
// ---------------------------------------------------------------------------

/// Roster of a section: enrolled students with their session windows.
pub async fn section_roster(
    State(state): State<AppState>,
    Path((classroom_id, section_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let section = ClassSectionRepo::find_by_id(&state.pool, section_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ClassSection",
            id: section_id,
        }))?;
    if section.classroom_id != classroom_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Section does not belong to the specified classroom".into(),
        )));
    }

    let roster = ClassSectionRepo::roster(&state.pool, section_id).await?;

    Ok(Json(DataResponse { data: roster }))
}
