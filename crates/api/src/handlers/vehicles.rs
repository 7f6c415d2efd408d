//! Handlers for the vehicle fleet.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_db::models::vehicle::{CreateVehicle, UpdateVehicle, UpdateVehicleLocation};
use campus_db::repositories::VehicleRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /vehicles
// ---------------------------------------------------------------------------

/// Register a vehicle, optionally assigning a driver.
pub async fn create_vehicle(
    State(state): State<AppState>,
    Json(body): Json<CreateVehicle>,
) -> AppResult<impl IntoResponse> {
    let vehicle = VehicleRepo::create(&state.pool, &body).await?;

    tracing::info!(vehicle_id = vehicle.id, "Vehicle registered");
    Ok((StatusCode::CREATED, Json(DataResponse { data: vehicle })))
}

// ---------------------------------------------------------------------------
// GET /vehicles
// ---------------------------------------------------------------------------

/// List the fleet with assigned driver names.
pub async fn list_vehicles(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let vehicles = VehicleRepo::list_with_drivers(&state.pool).await?;

    Ok(Json(DataResponse { data: vehicles }))
}

// ---------------------------------------------------------------------------
// GET /vehicles/{id}
// ---------------------------------------------------------------------------

/// Get one vehicle.
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let vehicle = VehicleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Vehicle", id }))?;

    Ok(Json(DataResponse { data: vehicle }))
}

// ---------------------------------------------------------------------------
// PATCH /vehicles/{id}
// ---------------------------------------------------------------------------

/// Patch a vehicle's number or driver assignment.
pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateVehicle>,
) -> AppResult<impl IntoResponse> {
    let vehicle = VehicleRepo::update(&state.pool, id, &body).await?;

    Ok(Json(DataResponse { data: vehicle }))
}

// ---------------------------------------------------------------------------
// PUT /vehicles/{id}/location
// ---------------------------------------------------------------------------

/// Record a GPS ping for a vehicle.
pub async fn update_vehicle_location(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateVehicleLocation>,
) -> AppResult<impl IntoResponse> {
    let vehicle = VehicleRepo::update_location(&state.pool, id, &body).await?;

    Ok(Json(DataResponse { data: vehicle }))
}

// ---------------------------------------------------------------------------
// POST /vehicles/{id}/delink-driver
// ---------------------------------------------------------------------------

/// Remove the driver assignment from a vehicle.
pub async fn delink_driver(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let vehicle = VehicleRepo::delink_driver(&state.pool, id).await?;

    Ok(Json(DataResponse { data: vehicle }))
}

// ---------------------------------------------------------------------------
// DELETE /vehicles/{id}
// ---------------------------------------------------------------------------

/// Delete a vehicle.
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = VehicleRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Vehicle", id }));
    }

    Ok(Json(DataResponse { data: true }))
}
