//! Handlers for classrooms.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_db::models::class_section::ClassSection;
use campus_db::models::classroom::{Classroom, CreateClassroom, UpdateClassroom};
use campus_db::repositories::{ClassSectionRepo, ClassroomRepo};

use crate::error::{AppError, AppResult};
use crate::query::ForceParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// A classroom together with its sections.
#[derive(Debug, Serialize)]
pub struct ClassroomWithSections {
    pub classroom: Classroom,
    pub sections: Vec<ClassSection>,
}

// ---------------------------------------------------------------------------
// POST /classrooms
// ---------------------------------------------------------------------------

/// Create a classroom.
pub async fn create_classroom(
    State(state): State<AppState>,
    Json(body): Json<CreateClassroom>,
) -> AppResult<impl IntoResponse> {
    let classroom = ClassroomRepo::create(&state.pool, &body).await?;

    tracing::info!(classroom_id = classroom.id, "Classroom created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: classroom })))
}

// ---------------------------------------------------------------------------
// GET /classrooms
// ---------------------------------------------------------------------------

/// List all classrooms with their sections.
pub async fn list_classrooms(
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let classrooms = ClassroomRepo::list(&state.pool).await?;

    let mut result = Vec::with_capacity(classrooms.len());
    for classroom in classrooms {
        let sections = ClassSectionRepo::list_by_classroom(&state.pool, classroom.id).await?;
        result.push(ClassroomWithSections { classroom, sections });
    }

    Ok(Json(DataResponse { data: result }))
}

// ---------------------------------------------------------------------------
// GET /classrooms/{id}
// ---------------------------------------------------------------------------

/// Get one classroom with its sections.
pub async fn get_classroom(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let classroom = ClassroomRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Classroom", id }))?;
    let sections = ClassSectionRepo::list_by_classroom(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: ClassroomWithSections { classroom, sections },
    }))
}

// ---------------------------------------------------------------------------
// PATCH /classrooms/{id}
// ---------------------------------------------------------------------------

/// Patch a classroom.
pub async fn update_classroom(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateClassroom>,
) -> AppResult<impl IntoResponse> {
    let classroom = ClassroomRepo::update(&state.pool, id, &body)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Classroom", id }))?;

    Ok(Json(DataResponse { data: classroom }))
}

// ---------------------------------------------------------------------------
// DELETE /classrooms/{id}
// ---------------------------------------------------------------------------

/// Delete a classroom. Refused while sections exist unless `?force=true`.
pub async fn delete_classroom(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<ForceParams>,
) -> AppResult<impl IntoResponse> {
    ClassroomRepo::delete(&state.pool, id, params.force).await?;

    Ok(Json(DataResponse { data: true }))
}
